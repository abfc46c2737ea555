//! Command dispatcher
//!
//! Routes CLI commands to their handlers and turns the outcome into the
//! process exit code.

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::error::{BertError, Result};
use crate::traits::AppContext;
use crate::ui as output;

/// Dispatch the parsed CLI command. Commands that do not touch a backend
/// run before the context is built.
pub fn dispatch(args: &Cli) -> Result<i32> {
    match &args.command {
        None => Err(BertError::Other(
            "No command specified. Run `bert --help` for usage.".to_string(),
        )),

        Some(Command::Completions { shell }) => {
            commands::completions::run(*shell)?;
            Ok(0)
        }

        Some(Command::SelfUpdate { check, version }) => {
            commands::self_update::run(commands::self_update::SelfUpdateOptions {
                check: *check,
                version: version.clone(),
                yes: args.global.yes,
            })?;
            Ok(0)
        }

        Some(_) => {
            let mut ctx = AppContext::new_filesystem(args.global.yes)?;
            dispatch_with_context(args, &mut ctx)
        }
    }
}

/// Run a backend command against an existing context.
pub fn dispatch_with_context(args: &Cli, ctx: &mut AppContext) -> Result<i32> {
    let global = &args.global;
    let Some(command) = &args.command else {
        return dispatch(args);
    };

    match command {
        Command::Install { package } => {
            commands::install::run(
                ctx,
                commands::install::InstallOptions {
                    package: package.clone(),
                    node: global.node,
                    cask: global.cask,
                },
            )?;
        }

        Command::Uninstall { package } => {
            commands::uninstall::run(
                ctx,
                commands::uninstall::UninstallOptions {
                    package: package.clone(),
                    node: global.node,
                    cask: global.cask,
                },
            )?;
        }

        Command::Update { packages } => {
            commands::update::run(
                ctx,
                commands::update::UpdateOptions {
                    packages: packages.clone(),
                    node: global.node,
                },
            )?;
        }

        Command::Search { query } => {
            commands::search::run(
                ctx,
                commands::search::SearchOptions {
                    query: query.clone(),
                    node: global.node,
                    cask: global.cask,
                },
            )?;
        }

        Command::List { json } => {
            commands::list::run(
                ctx,
                commands::list::ListOptions {
                    node: global.node,
                    json: *json,
                },
            )?;
        }

        Command::Backup { output } => {
            commands::backup::run(
                ctx,
                commands::backup::BackupOptions {
                    output: output.clone(),
                },
            )?;
        }

        Command::Restore {
            path,
            input,
            pin_versions,
        } => {
            commands::restore::run(
                ctx,
                commands::restore::RestoreOptions {
                    input: input.clone().or_else(|| path.clone()),
                    pin_versions: *pin_versions,
                },
            )?;
        }

        Command::SetManager { manager } => {
            commands::set_manager::run(ctx, manager)?;
        }

        Command::External(argv) => {
            if global.node || global.cask {
                output::verbose("--node and --cask are ignored when running a command");
            }
            return commands::exec::run(ctx, argv);
        }

        Command::Completions { .. } | Command::SelfUpdate { .. } => return dispatch(args),
    }

    Ok(0)
}
