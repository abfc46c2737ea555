//! `bert <command> [args...]`: run a command, installing the package that
//! provides it first when it is not on PATH.

use crate::core::types::{Backend, PackageSpec};
use crate::error::{BertError, Result};
use crate::traits::AppContext;
use crate::ui as output;
use crate::utils::{process, sanitize};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Run the command and return its exit code.
pub fn run(ctx: &AppContext, args: &[String]) -> Result<i32> {
    let (command, rest) = args.split_first().ok_or_else(|| {
        BertError::Other("No command specified. Use --help for usage information.".to_string())
    })?;

    let program = resolve_or_install(ctx, command)?;

    output::verbose(&format!(
        "running: {}",
        process::display_command(
            &program.to_string_lossy(),
            &rest.iter().map(String::as_str).collect::<Vec<_>>()
        )
    ));

    let status = Command::new(&program)
        .args(rest)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| BertError::SystemCommandFailed {
            command: command.clone(),
            reason: e.to_string(),
        })?;

    Ok(process::forwarded_exit_code(&status))
}

/// Path of `command`, provisioning its package through the system backend
/// when it is missing.
pub fn resolve_or_install(ctx: &AppContext, command: &str) -> Result<PathBuf> {
    let executable = ctx.platform.executable_name(command);
    if let Ok(path) = which::which(&executable) {
        return Ok(path);
    }

    let spec = provision(ctx, command)?;

    which::which(&executable).map_err(|_| {
        BertError::Other(format!(
            "{} is installed but provides no '{}' executable on PATH",
            spec.name, command
        ))
    })
}

fn provision(ctx: &AppContext, command: &str) -> Result<PackageSpec> {
    sanitize::validate_command_name(command)?;

    let manager = ctx.manager(Backend::System)?;
    let spec = manager
        .provider_of(command)?
        .ok_or_else(|| BertError::CommandNotFound(command.to_string()))?;

    if manager.is_installed(&spec)? {
        output::verbose(&format!("{} is already installed", spec.name));
        return Ok(spec);
    }

    output::warning(&format!("{} not found. Installing {}...", command, spec));
    manager.install(&spec)?;
    output::success(&format!("Successfully installed {}", spec.name));
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mock_env;
    use tempfile::tempdir;

    const MISSING: &str = "bert-test-no-such-command";

    #[test]
    fn unknown_command_without_provider_is_not_found() {
        let dir = tempdir().expect("tempdir");
        let env = mock_env(dir.path());

        let err = run(&env.ctx, &[MISSING.to_string()]).expect_err("not found");
        assert!(matches!(err, BertError::CommandNotFound(ref c) if c == MISSING));
        assert!(env.system.lock().expect("lock").install_calls.is_empty());
    }

    #[test]
    fn provider_installed_at_most_once() {
        let dir = tempdir().expect("tempdir");
        let env = mock_env(dir.path());
        env.system
            .lock()
            .expect("lock")
            .providers
            .insert(MISSING.to_string(), "fake-tools".to_string());

        // the mock installs nothing onto PATH, so both runs end in an error
        let _ = resolve_or_install(&env.ctx, MISSING);
        let _ = resolve_or_install(&env.ctx, MISSING);

        assert_eq!(
            env.system.lock().expect("lock").install_calls,
            vec!["fake-tools"]
        );
    }

    #[test]
    fn installed_provider_without_executable_names_both() {
        let dir = tempdir().expect("tempdir");
        let env = mock_env(dir.path());
        env.system
            .lock()
            .expect("lock")
            .providers
            .insert(MISSING.to_string(), "fake-tools".to_string());

        let err = resolve_or_install(&env.ctx, MISSING).expect_err("still missing");
        match err {
            BertError::Other(msg) => {
                assert!(msg.contains("fake-tools is installed"));
                assert!(msg.contains(&format!("no '{}' executable", MISSING)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unsafe_command_names_are_rejected() {
        let dir = tempdir().expect("tempdir");
        let env = mock_env(dir.path());

        let err = resolve_or_install(&env.ctx, "./does-not-exist").expect_err("rejected");
        assert!(matches!(err, BertError::CommandNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn existing_command_runs_and_forwards_exit_code() {
        let dir = tempdir().expect("tempdir");
        let env = mock_env(dir.path());

        let code = run(
            &env.ctx,
            &["sh".to_string(), "-c".to_string(), "exit 5".to_string()],
        )
        .expect("runs");
        assert_eq!(code, 5);
    }
}
