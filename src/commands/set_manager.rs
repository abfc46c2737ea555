use crate::error::Result;
use crate::packages::node::NodeTool;
use crate::traits::AppContext;
use crate::ui as output;

pub fn run(ctx: &mut AppContext, manager: &str) -> Result<()> {
    let tool: NodeTool = manager.parse()?;
    let path = ctx.paths.config_file();
    ctx.settings.set_node_package_manager(tool, &path)?;

    output::success(&format!("Package manager set to: {}", tool));
    if which::which(tool.command()).is_err() {
        output::warning(&format!(
            "{} is not installed yet; Node package commands will fail until it is",
            tool
        ));
    }
    Ok(())
}
