pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod packages;
pub mod project_identity;
pub mod snapshot;
pub mod traits;
pub mod ui;
pub mod utils;

use clap::Parser;
use std::process::exit;

/// Run the bert CLI entrypoint.
pub fn run_cli() {
    // Color settings first, everything after may print
    ui::init_colors();

    // Mark cancellation; long loops check it between items
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        ui::mark_interrupted();
        ui::warning("Operation cancelled by user.");
    }) {
        ui::warning(&format!("Could not install Ctrl-C handler: {}", e));
    }

    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    match cli::dispatcher::dispatch(&args) {
        Ok(code) => exit(code),
        Err(e) => {
            ui::error(&format!("{}", e));
            exit(1);
        }
    }
}
