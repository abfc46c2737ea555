use crate::core::types::{Backend, InstalledPackage};
use crate::error::Result;
use crate::traits::AppContext;
use crate::ui as output;
use colored::Colorize;

/// Options for the list command
pub struct ListOptions {
    pub node: bool,
    pub json: bool,
}

pub fn run(ctx: &AppContext, options: ListOptions) -> Result<()> {
    let backend = Backend::from_node_flag(options.node);
    let manager = ctx.manager(backend)?;
    let mut packages = manager.list_installed()?;
    packages.sort_by(|a, b| (a.cask, &a.name).cmp(&(b.cask, &b.name)));

    if options.json {
        println!("{}", serde_json::to_string_pretty(&packages)?);
        return Ok(());
    }

    output::header(&format!("Installed packages ({})", manager.tool_name()));
    display_packages(&packages);
    Ok(())
}

fn display_packages(packages: &[InstalledPackage]) {
    if packages.is_empty() {
        output::info("No packages installed");
        return;
    }

    let (casks, formulae): (Vec<_>, Vec<_>) = packages.iter().partition(|pkg| pkg.cask);

    for pkg in &formulae {
        print_line(pkg);
    }
    if !casks.is_empty() {
        println!();
        println!("  {}", "Casks".bold());
        for pkg in &casks {
            print_line(pkg);
        }
    }

    println!();
    output::info(&format!("Total: {} package(s)", packages.len()));
}

fn print_line(pkg: &InstalledPackage) {
    match &pkg.version {
        Some(version) => println!("  {} {}", pkg.name, version.dimmed()),
        None => println!("  {}", pkg.name),
    }
}
