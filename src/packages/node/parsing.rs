//! Parsers for the global listings of npm, pnpm, yarn and bun.

use crate::core::types::{Backend, InstalledPackage, PackageDetails, PackageSearchResult};
use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
struct DependencyTree {
    #[serde(default)]
    dependencies: BTreeMap<String, DependencyEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct DependencyEntry {
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NpmSearchEntry {
    name: String,
    version: Option<String>,
    description: Option<String>,
}

fn language_package(name: &str, version: Option<String>) -> InstalledPackage {
    InstalledPackage {
        name: name.to_string(),
        version,
        backend: Backend::Language,
        cask: false,
    }
}

fn from_tree(tree: DependencyTree) -> Vec<InstalledPackage> {
    tree.dependencies
        .into_iter()
        .map(|(name, entry)| language_package(&name, entry.version))
        .collect()
}

/// `npm list -g --depth=0 --json`: `{"dependencies": {"name": {"version": ...}}}`.
/// `None` when stdout is not JSON.
pub(super) fn parse_npm_list(stdout: &str) -> Option<Vec<InstalledPackage>> {
    if stdout.trim().is_empty() {
        return Some(Vec::new());
    }
    serde_json::from_str::<DependencyTree>(stdout)
        .ok()
        .map(from_tree)
}

/// `pnpm list -g --depth=0 --json`: an array of trees, one per global dir.
pub(super) fn parse_pnpm_list(stdout: &str) -> Option<Vec<InstalledPackage>> {
    if stdout.trim().is_empty() {
        return Some(Vec::new());
    }
    let trees: Vec<DependencyTree> = serde_json::from_str(stdout).ok()?;
    Some(trees.into_iter().flat_map(from_tree).collect())
}

/// `yarn global list`: `info "name@version" has binaries:` lines.
pub(super) fn parse_yarn_global_list(stdout: &str) -> Vec<InstalledPackage> {
    stdout
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("info \"")?;
            let quoted = &rest[..rest.find('"')?];
            Some(split_at_version(quoted))
        })
        .collect()
}

/// Tree-style listings (`bun pm ls -g`): `├── name@version` lines.
pub(super) fn parse_tree_list(stdout: &str) -> Vec<InstalledPackage> {
    stdout
        .lines()
        .filter_map(|line| {
            let entry = line
                .trim_start_matches(['│', '├', '└', '─', ' '])
                .trim();
            if entry.is_empty() || entry.starts_with('/') || entry.contains(' ') {
                return None;
            }
            Some(split_at_version(entry))
        })
        .collect()
}

fn split_at_version(entry: &str) -> InstalledPackage {
    match entry.rfind('@') {
        Some(idx) if idx > 0 => {
            language_package(&entry[..idx], Some(entry[idx + 1..].to_string()))
        }
        _ => language_package(entry, None),
    }
}

/// `npm search --json`
pub(super) fn parse_npm_search(stdout: &str) -> Result<Vec<PackageSearchResult>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<NpmSearchEntry> = serde_json::from_str(stdout)?;
    Ok(entries
        .into_iter()
        .map(|e| PackageSearchResult {
            name: e.name,
            version: e.version,
            description: e.description,
            backend: Backend::Language,
            cask: false,
        })
        .collect())
}

/// Packument from the npm registry (`GET /<name>`). `license`, `author`
/// and `keywords` come in more than one shape across old and new packages.
#[derive(Debug, Deserialize)]
struct RegistryDocument {
    name: String,
    description: Option<String>,
    homepage: Option<String>,
    license: Option<Value>,
    author: Option<Value>,
    keywords: Option<Value>,
    #[serde(rename = "dist-tags", default)]
    dist_tags: BTreeMap<String, String>,
}

pub(super) fn parse_registry_document(body: &str) -> Result<PackageDetails> {
    let doc: RegistryDocument = serde_json::from_str(body)?;

    let license = doc.license.as_ref().and_then(|value| match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("type").and_then(Value::as_str).map(str::to_string),
        _ => None,
    });

    let author = doc.author.as_ref().and_then(|value| match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            let name = map.get("name").and_then(Value::as_str)?;
            Some(match map.get("email").and_then(Value::as_str) {
                Some(email) => format!("{} <{}>", name, email),
                None => name.to_string(),
            })
        }
        _ => None,
    });

    let keywords = match &doc.keywords {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s.split_whitespace().map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let other_versions = doc
        .dist_tags
        .iter()
        .filter(|(tag, _)| tag.as_str() != "latest")
        .map(|(tag, version)| format!("{}: {}", tag, version))
        .collect();

    Ok(PackageDetails {
        latest: doc.dist_tags.get("latest").cloned(),
        name: doc.name,
        kind: "npm package".to_string(),
        description: doc.description,
        license,
        homepage: doc.homepage,
        tap: None,
        author,
        other_versions,
        aliases: Vec::new(),
        keywords,
    })
}
