use serde::{Deserialize, Serialize};
use std::fmt;

// Package ecosystems bert can drive.
// To add one, add a variant here, implement `PackageManager` for it and
// register a factory in `BackendRegistry::register_defaults()`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Homebrew formulae and casks
    System,
    /// Globally installed Node packages
    Language,
}

impl Backend {
    pub fn all() -> [Backend; 2] {
        [Backend::System, Backend::Language]
    }

    pub fn from_node_flag(node: bool) -> Self {
        if node { Backend::Language } else { Backend::System }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Language => write!(f, "language"),
        }
    }
}

/// A unit the user wants to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub version: Option<String>,
    pub backend: Backend,
    pub cask: bool,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, backend: Backend) -> Self {
        Self {
            name: name.into(),
            version: None,
            backend,
            cask: false,
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_cask(mut self, cask: bool) -> Self {
        self.cask = cask && self.backend == Backend::System;
        self
    }

    /// Parse `name` or `name@version` for the given backend.
    ///
    /// A leading `@` belongs to the name (`@scope/pkg@1.0`).
    pub fn parse(input: &str, backend: Backend, cask: bool) -> Self {
        let (name, version) = split_version(input.trim());
        PackageSpec::new(name, backend)
            .with_version(version.map(str::to_string))
            .with_cask(cask)
    }

    /// Name as handed to the backend, `name@version` when pinned.
    pub fn versioned_name(&self) -> String {
        match &self.version {
            Some(v) => format!("{}@{}", self.name, v),
            None => self.name.clone(),
        }
    }

    /// Homebrew tap prefix of a `user/tap/formula` name.
    pub fn tap(&self) -> Option<String> {
        let parts: Vec<&str> = self.name.split('/').collect();
        match parts.as_slice() {
            [user, repo, _formula] if self.backend == Backend::System => {
                Some(format!("{}/{}", user, repo))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.backend, self.cask) {
            (Backend::System, true) => write!(f, "{} (cask)", self.versioned_name()),
            (Backend::System, false) => write!(f, "{}", self.versioned_name()),
            (Backend::Language, _) => write!(f, "node:{}", self.versioned_name()),
        }
    }
}

fn split_version(input: &str) -> (&str, Option<&str>) {
    match input.rfind('@') {
        Some(idx) if idx > 0 && idx + 1 < input.len() => (&input[..idx], Some(&input[idx + 1..])),
        Some(idx) if idx > 0 => (&input[..idx], None),
        _ => (input, None),
    }
}

/// A package as reported by a backend listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    pub name: String,
    pub version: Option<String>,
    pub backend: Backend,
    #[serde(default)]
    pub cask: bool,
}

/// Search result from a backend repository
#[derive(Debug, Clone, Serialize)]
pub struct PackageSearchResult {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub backend: Backend,
    pub cask: bool,
}

/// What a backend knows about a package before it is installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDetails {
    pub name: String,
    /// "Formula", "Cask" or "npm package"
    pub kind: String,
    pub description: Option<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub tap: Option<String>,
    pub author: Option<String>,
    pub latest: Option<String>,
    /// Versioned formulae or npm dist-tags (`tag: version`)
    pub other_versions: Vec<String>,
    pub aliases: Vec<String>,
    pub keywords: Vec<String>,
}

impl PackageDetails {
    /// Label/value pairs worth printing, in display order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("Name", self.name.clone()), ("Type", self.kind.clone())];
        let optional = [
            ("Description", &self.description),
            ("License", &self.license),
            ("Homepage", &self.homepage),
            ("Tap", &self.tap),
            ("Author", &self.author),
            ("Latest", &self.latest),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| value.clone().map(|v| (label, v))),
        );
        let lists = [
            ("Other versions", &self.other_versions),
            ("Aliases", &self.aliases),
            ("Keywords", &self.keywords),
        ];
        fields.extend(
            lists
                .into_iter()
                .filter(|(_, values)| !values.is_empty())
                .map(|(label, values)| (label, values.join(", "))),
        );
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_name() {
        let spec = PackageSpec::parse("ripgrep", Backend::System, false);
        assert_eq!(spec.name, "ripgrep");
        assert_eq!(spec.version, None);
        assert!(!spec.cask);
    }

    #[test]
    fn parse_name_with_version() {
        let spec = PackageSpec::parse("python@3.11", Backend::System, false);
        assert_eq!(spec.name, "python");
        assert_eq!(spec.version.as_deref(), Some("3.11"));
        assert_eq!(spec.versioned_name(), "python@3.11");
    }

    #[test]
    fn parse_scoped_node_package_keeps_scope() {
        let plain = PackageSpec::parse("@angular/cli", Backend::Language, false);
        assert_eq!(plain.name, "@angular/cli");
        assert_eq!(plain.version, None);

        let pinned = PackageSpec::parse("@angular/cli@17.0.1", Backend::Language, false);
        assert_eq!(pinned.name, "@angular/cli");
        assert_eq!(pinned.version.as_deref(), Some("17.0.1"));
    }

    #[test]
    fn trailing_at_is_not_a_version() {
        let spec = PackageSpec::parse("node@", Backend::System, false);
        assert_eq!(spec.name, "node");
        assert_eq!(spec.version, None);
    }

    #[test]
    fn cask_flag_ignored_for_language_backend() {
        let spec = PackageSpec::parse("typescript", Backend::Language, true);
        assert!(!spec.cask);
    }

    #[test]
    fn tap_detected_only_for_three_part_system_names() {
        let tapped = PackageSpec::parse("oven-sh/bun/bun", Backend::System, false);
        assert_eq!(tapped.tap().as_deref(), Some("oven-sh/bun"));

        let core = PackageSpec::parse("bun", Backend::System, false);
        assert_eq!(core.tap(), None);

        let scoped = PackageSpec::parse("@types/node", Backend::Language, false);
        assert_eq!(scoped.tap(), None);
    }

    #[test]
    fn details_fields_skip_missing_values() {
        let details = PackageDetails {
            name: "wget".into(),
            kind: "Formula".into(),
            license: Some("GPL-3.0-or-later".into()),
            aliases: vec!["wget2".into(), "gwget".into()],
            ..PackageDetails::default()
        };
        let labels: Vec<_> = details.fields().into_iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Name", "Type", "License", "Aliases"]);
        assert_eq!(details.fields()[3].1, "wget2, gwget");
    }
}
