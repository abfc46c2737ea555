use crate::core::types::{Backend, PackageSpec};
use crate::error::Result;
use crate::traits::AppContext;
use crate::ui as output;
use crate::utils::sanitize;

pub struct UninstallOptions {
    pub package: String,
    pub node: bool,
    pub cask: bool,
}

pub fn run(ctx: &AppContext, options: UninstallOptions) -> Result<()> {
    let backend = Backend::from_node_flag(options.node);
    let mut spec = PackageSpec::parse(&options.package, backend, options.cask);
    if spec.version.take().is_some() {
        output::warning("Uninstall removes every installed version; ignoring the version");
    }
    sanitize::validate_package_name(&spec.name)?;

    let manager = ctx.manager(backend)?;
    output::info(&format!(
        "Uninstalling {} via {}...",
        spec,
        manager.tool_name()
    ));
    manager.remove(&spec)?;
    output::success(&format!("Uninstalled {}", spec.name));
    Ok(())
}
