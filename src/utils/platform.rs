use serde::{Deserialize, Serialize};
use std::fmt;

/// Host operating system, detected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOS,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else {
            Platform::Linux
        }
    }

    /// Name of an executable as it appears on disk.
    pub fn executable_name(&self, command: &str) -> String {
        match self {
            Platform::Windows if !command.to_ascii_lowercase().ends_with(".exe") => {
                format!("{}.exe", command)
            }
            _ => command.to_string(),
        }
    }

    /// Line a user adds to their shell profile after installing Homebrew.
    pub fn brew_shellenv_hint(&self) -> &'static str {
        match self {
            Platform::Linux => "eval \"$(/home/linuxbrew/.linuxbrew/bin/brew shellenv)\"",
            Platform::MacOS => "eval \"$(/opt/homebrew/bin/brew shellenv)\"",
            Platform::Windows => "Add the Homebrew bin directory to your PATH",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::MacOS => write!(f, "macos"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}
