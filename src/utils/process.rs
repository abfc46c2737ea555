//! Spawning backend processes.
//!
//! Every external command bert runs goes through here so `--verbose` shows
//! the exact command line and spawn failures carry the program name.

use crate::error::{BertError, Result};
use crate::ui;
use std::process::{Command, ExitStatus, Output, Stdio};

/// Render a program invocation as a shell-quoted line for logs and errors.
pub fn display_command(program: &str, args: &[&str]) -> String {
    let words = std::iter::once(program).chain(args.iter().copied());
    shlex::try_join(words).unwrap_or_else(|_| {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    })
}

/// Run non-interactively and capture stdout/stderr.
pub fn capture(program: &str, args: &[&str]) -> Result<Output> {
    let line = display_command(program, args);
    ui::verbose(&format!("running: {}", line));

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| BertError::SystemCommandFailed {
            command: line,
            reason: e.to_string(),
        })
}

/// Run with the terminal attached so the backend's own progress and error
/// text reach the user.
pub fn interactive(program: &str, args: &[&str]) -> Result<ExitStatus> {
    let line = display_command(program, args);
    ui::verbose(&format!("running: {}", line));

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| BertError::SystemCommandFailed {
            command: line,
            reason: e.to_string(),
        })?;

    if ui::is_interrupted() {
        return Err(BertError::Interrupted);
    }
    Ok(status)
}

/// Capture and require success, surfacing the backend's stderr on failure.
pub fn capture_checked(program: &str, args: &[&str]) -> Result<String> {
    let output = capture(program, args)?;
    if !output.status.success() {
        return Err(BertError::PackageManagerError(failure_message(
            program, args, &output,
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run interactively and require success.
pub fn interactive_checked(program: &str, args: &[&str]) -> Result<()> {
    let status = interactive(program, args)?;
    if !status.success() {
        return Err(BertError::PackageManagerError(format!(
            "`{}` exited with {}",
            display_command(program, args),
            describe_status(&status)
        )));
    }
    Ok(())
}

pub fn failure_message(program: &str, args: &[&str], output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let base = format!(
        "`{}` exited with {}",
        display_command(program, args),
        describe_status(&output.status)
    );
    if stderr.is_empty() {
        base
    } else {
        format!("{}: {}", base, stderr)
    }
}

pub fn describe_status(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

/// Exit code to forward for a finished child. Signal deaths map to
/// `128 + signal` on Unix.
pub fn forwarded_exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
