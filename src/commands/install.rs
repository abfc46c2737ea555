use crate::core::types::{Backend, PackageSpec};
use crate::error::{BertError, Result};
use crate::packages::PackageManager;
use crate::traits::AppContext;
use crate::ui as output;
use crate::utils::sanitize;

pub struct InstallOptions {
    pub package: String,
    pub node: bool,
    pub cask: bool,
}

pub fn run(ctx: &AppContext, options: InstallOptions) -> Result<()> {
    let backend = Backend::from_node_flag(options.node);
    let spec = PackageSpec::parse(&options.package, backend, options.cask);
    sanitize::validate_package_name(&spec.name)?;
    if let Some(version) = &spec.version {
        sanitize::validate_version(version)?;
    }

    let manager = ctx.manager(backend)?;
    ensure_runtime(ctx, manager.as_ref())?;
    manager.ensure_ready()?;
    show_details(manager.as_ref(), &spec);

    output::info(&format!(
        "Installing {} via {}...",
        spec,
        manager.tool_name()
    ));
    manager.install(&spec)?;
    output::success(&format!("Successfully installed {}", spec.name));
    Ok(())
}

/// Print what is known about the package; lookup failures never block the install.
fn show_details(manager: &dyn PackageManager, spec: &PackageSpec) {
    match manager.package_info(spec) {
        Ok(Some(details)) => {
            output::header("Package information");
            for (label, value) in details.fields() {
                output::keyval(label, &value);
            }
        }
        Ok(None) => output::verbose(&format!("No details found for {}", spec.name)),
        Err(e) => output::verbose(&format!("Could not fetch details for {}: {}", spec.name, e)),
    }
}

/// Install the system package a backend depends on (Node for the Node
/// tools) before using that backend.
pub(crate) fn ensure_runtime(ctx: &AppContext, manager: &dyn PackageManager) -> Result<()> {
    let Some(runtime) = manager.missing_runtime() else {
        return Ok(());
    };

    output::warning(&format!(
        "{} requires {}. Installing {} first...",
        manager.tool_name(),
        runtime.name,
        runtime.name
    ));
    ctx.manager(Backend::System)?.install(&runtime)?;

    if manager.missing_runtime().is_some() {
        return Err(BertError::BackendUnavailable {
            backend: runtime.name,
            hint: "it was installed but is not on PATH yet; open a new shell and retry"
                .to_string(),
        });
    }
    Ok(())
}
