use crate::core::types::{Backend, PackageSearchResult};
use crate::error::Result;
use crate::traits::AppContext;
use crate::ui as output;
use colored::Colorize;

pub struct SearchOptions {
    pub query: String,
    pub node: bool,
    pub cask: bool,
}

pub fn run(ctx: &AppContext, options: SearchOptions) -> Result<()> {
    let results = search(ctx, &options)?;

    if results.is_empty() {
        output::warning(&format!("No packages found matching '{}'", options.query));
        return Ok(());
    }

    output::header(&format!("Results for '{}'", options.query));
    render(&results, output::term_width());
    Ok(())
}

/// Query exactly one backend: the language backend with `--node`, the
/// system backend otherwise.
pub fn search(ctx: &AppContext, options: &SearchOptions) -> Result<Vec<PackageSearchResult>> {
    let backend = Backend::from_node_flag(options.node);
    let manager = ctx.manager(backend)?;
    output::info(&format!(
        "Searching {} for '{}'...",
        manager.tool_name(),
        options.query
    ));
    manager.search(&options.query, options.cask)
}

fn render(results: &[PackageSearchResult], width: usize) {
    let name_width = results
        .iter()
        .map(|r| label(r).chars().count())
        .max()
        .unwrap_or(0)
        .min(40);

    for result in results {
        let name = label(result);
        let Some(desc) = result.description.as_deref().filter(|d| !d.is_empty()) else {
            println!("  {}", name.bold());
            continue;
        };
        let room = width.saturating_sub(name_width + 4);
        let padded = format!("{:<width$}", name, width = name_width);
        println!(
            "  {}  {}",
            padded.bold(),
            output::truncate(desc, room.max(10)).dimmed()
        );
    }
}

fn label(result: &PackageSearchResult) -> String {
    match &result.version {
        Some(version) => format!("{}@{}", result.name, version),
        None if result.cask => format!("{} (cask)", result.name),
        None => result.name.clone(),
    }
}
