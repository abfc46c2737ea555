use crate::core::types::Backend;
use crate::error::Result;
use crate::traits::AppContext;
use crate::ui as output;
use crate::utils::sanitize;

pub struct UpdateOptions {
    /// Empty means everything the backend manages
    pub packages: Vec<String>,
    pub node: bool,
}

pub fn run(ctx: &AppContext, options: UpdateOptions) -> Result<()> {
    sanitize::validate_package_names(&options.packages)?;

    let backend = Backend::from_node_flag(options.node);
    let manager = ctx.manager(backend)?;

    if options.packages.is_empty() {
        output::info(&format!(
            "Updating all packages via {}...",
            manager.tool_name()
        ));
    } else {
        output::info(&format!(
            "Updating {} via {}...",
            options.packages.join(", "),
            manager.tool_name()
        ));
    }

    manager.update(&options.packages)?;
    output::success("Packages updated successfully");
    Ok(())
}
