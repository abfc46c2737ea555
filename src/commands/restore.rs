use crate::commands::install::ensure_runtime;
use crate::core::types::Backend;
use crate::error::{BertError, Result};
use crate::packages::PackageManager;
use crate::snapshot::BackupFile;
use crate::snapshot::io::acquire_lock;
use crate::traits::AppContext;
use crate::ui as output;
use crate::utils::paths;
use std::collections::HashSet;
use std::path::PathBuf;

pub struct RestoreOptions {
    /// Backup to read; the newest one in the backup directory otherwise
    pub input: Option<PathBuf>,
    /// Ask for the recorded versions instead of the latest ones
    pub pin_versions: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub installed: usize,
    pub skipped: usize,
    /// (item, reason)
    pub failed: Vec<(String, String)>,
}

impl RestoreReport {
    pub fn total(&self) -> usize {
        self.installed + self.skipped + self.failed.len()
    }

    fn record(&mut self, label: &str, result: Result<()>) {
        match result {
            Ok(()) => {
                output::outcome(label, true, None);
                self.installed += 1;
            }
            Err(e) => {
                let reason = e.to_string();
                output::outcome(label, false, Some(&reason));
                self.failed.push((label.to_string(), reason));
            }
        }
    }

    fn skip(&mut self, label: &str) {
        output::outcome(label, true, Some("already installed"));
        self.skipped += 1;
    }
}

pub fn run(ctx: &AppContext, options: RestoreOptions) -> Result<()> {
    let report = restore(ctx, options)?;

    output::header("Summary");
    output::keyval("Installed", &report.installed.to_string());
    output::keyval("Already present", &report.skipped.to_string());
    output::keyval("Failed", &report.failed.len().to_string());

    if report.failed.is_empty() {
        output::success("Restore completed successfully!");
        return Ok(());
    }

    for (item, reason) in &report.failed {
        output::error(&format!("{}: {}", item, reason));
    }
    Err(BertError::PartialRestore {
        failed: report.failed.len(),
        total: report.total(),
    })
}

/// Reinstall everything in a backup: taps first, then packages. One failing
/// item never stops the rest; a backend that cannot be made ready fails all
/// of its items at once.
pub fn restore(ctx: &AppContext, options: RestoreOptions) -> Result<RestoreReport> {
    let _lock = acquire_lock(&ctx.paths.lock_file())?;

    let path = match options.input {
        Some(path) => paths::expand_home(&path)?,
        None => ctx.backup_store.latest(&ctx.backups_dir()?)?,
    };
    let backup = ctx.backup_store.read(&path)?;

    output::info(&format!("Restoring from {}", path.display()));
    output::keyval("Backup created at", &backup.created_at.to_rfc3339());
    if let Some(host) = &backup.hostname {
        output::keyval("Host", host);
    }
    output::info(&format!(
        "Restoring {} taps, {} formulae, {} casks and {} Node packages",
        backup.taps.len(),
        backup.count(Backend::System, false),
        backup.count(Backend::System, true),
        backup.count(Backend::Language, false),
    ));
    if options.pin_versions {
        output::info("Requesting the recorded versions");
    }

    let mut report = RestoreReport::default();

    for backend in Backend::all() {
        let has_taps = backend == Backend::System && !backup.taps.is_empty();
        if !has_taps && backup.packages_for(backend).next().is_none() {
            continue;
        }
        let manager = ctx.manager(backend)?;
        output::header(&format!("Restoring {} packages", manager.tool_name()));

        // one readiness check per backend, never one per item
        if let Err(e) = prepare_backend(ctx, manager.as_ref()) {
            fail_backend(&backup, backend, options.pin_versions, &e, &mut report);
            continue;
        }

        if has_taps {
            restore_taps(ctx, manager.as_ref(), &backup, &mut report)?;
        }
        restore_packages(ctx, manager.as_ref(), &backup, options.pin_versions, &mut report)?;
    }

    Ok(report)
}

fn prepare_backend(ctx: &AppContext, manager: &dyn PackageManager) -> Result<()> {
    ensure_runtime(ctx, manager)?;
    manager.ensure_ready()
}

/// Record every item of `backend` as failed with the same reason.
fn fail_backend(
    backup: &BackupFile,
    backend: Backend,
    pin_versions: bool,
    error: &BertError,
    report: &mut RestoreReport,
) {
    let reason = error.to_string();
    output::error(&reason);

    let taps = if backend == Backend::System {
        backup.taps.clone()
    } else {
        Vec::new()
    };
    let packages = backup
        .packages_for(backend)
        .map(|pkg| pkg.to_spec(pin_versions).to_string());

    for label in taps.into_iter().chain(packages) {
        output::outcome(&label, false, None);
        report.failed.push((label, reason.clone()));
    }
}

fn restore_taps(
    ctx: &AppContext,
    system: &dyn PackageManager,
    backup: &BackupFile,
    report: &mut RestoreReport,
) -> Result<()> {
    let existing: HashSet<String> = system.list_sources().unwrap_or_default().into_iter().collect();

    for tap in &backup.taps {
        check_interrupted(ctx)?;
        if existing.contains(tap) {
            report.skip(tap);
            continue;
        }
        report.record(tap, system.add_source(tap));
    }
    Ok(())
}

fn restore_packages(
    ctx: &AppContext,
    manager: &dyn PackageManager,
    backup: &BackupFile,
    pin_versions: bool,
    report: &mut RestoreReport,
) -> Result<()> {
    let backend = manager.backend_type();
    let installed: HashSet<(String, bool)> = match manager.list_installed() {
        Ok(list) => list.into_iter().map(|pkg| (pkg.name, pkg.cask)).collect(),
        Err(e) => {
            output::verbose(&format!("could not list installed packages: {}", e));
            HashSet::new()
        }
    };

    for pkg in backup.packages_for(backend) {
        check_interrupted(ctx)?;
        let spec = pkg.to_spec(pin_versions);
        let label = spec.to_string();
        if installed.contains(&(pkg.name.clone(), pkg.cask)) {
            report.skip(&label);
            continue;
        }
        report.record(&label, manager.install(&spec));
    }
    Ok(())
}

fn check_interrupted(ctx: &AppContext) -> Result<()> {
    if ctx.is_interrupted() {
        return Err(BertError::Interrupted);
    }
    Ok(())
}
