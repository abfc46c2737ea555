use crate::core::types::{Backend, InstalledPackage};
use crate::error::{BertError, Result};
use crate::packages::PackageManager;
use crate::project_identity;
use crate::snapshot::BackupFile;
use crate::snapshot::io::{acquire_lock, default_file_name};
use crate::traits::AppContext;
use crate::ui as output;
use crate::utils::paths;
use chrono::{Local, Utc};
use std::path::PathBuf;

pub struct BackupOptions {
    pub output: Option<PathBuf>,
}

struct SystemListing {
    packages: Vec<InstalledPackage>,
    taps: Vec<String>,
}

/// Write a backup and return where it went.
pub fn run(ctx: &AppContext, options: BackupOptions) -> Result<PathBuf> {
    let _lock = acquire_lock(&ctx.paths.lock_file())?;

    let path = match options.output {
        Some(path) => paths::expand_home(&path)?,
        None => ctx.backups_dir()?.join(default_file_name(Local::now())),
    };

    output::info("Creating backup of installed packages...");

    let system = ctx.manager(Backend::System)?;
    let language = ctx.manager(Backend::Language)?;

    let (system_listing, language_listing) = rayon::join(
        || list_system(system.as_ref()),
        || list_language(language.as_ref()),
    );
    let system_listing = system_listing?;
    let language_listing = language_listing?;

    let hostname = hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned());
    let mut backup = BackupFile::new(
        Utc::now(),
        project_identity::generator(),
        ctx.platform,
        hostname,
    );
    backup.taps = system_listing.taps;
    backup.add_packages(system_listing.packages);
    if let Some(packages) = language_listing {
        backup.node_package_manager = Some(ctx.settings.node_package_manager);
        backup.add_packages(packages);
    }
    backup.normalize();

    ctx.backup_store.write(&backup, &path)?;

    output::success("Backup created successfully!");
    output::keyval("Backup location", &path.display().to_string());
    output::indent(&format!("Formulae: {}", backup.count(Backend::System, false)), 1);
    output::indent(&format!("Casks: {}", backup.count(Backend::System, true)), 1);
    output::indent(&format!("Taps: {}", backup.taps.len()), 1);
    output::indent(
        &format!("Node packages: {}", backup.count(Backend::Language, false)),
        1,
    );

    Ok(path)
}

fn list_system(manager: &dyn PackageManager) -> Result<SystemListing> {
    let packages = manager.list_installed()?;
    let taps = manager.list_sources()?;
    Ok(SystemListing { packages, taps })
}

/// `None` when the Node tool is not installed; the backup then covers
/// Homebrew only.
fn list_language(manager: &dyn PackageManager) -> Result<Option<Vec<InstalledPackage>>> {
    if !manager.is_available() {
        output::warning(&format!(
            "{} is not available; skipping Node packages",
            manager.tool_name()
        ));
        return Ok(None);
    }
    match manager.list_installed() {
        Ok(packages) => Ok(Some(packages)),
        Err(BertError::BackendUnavailable { backend, .. }) => {
            output::warning(&format!("{} is not available; skipping Node packages", backend));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
