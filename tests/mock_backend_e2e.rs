#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BREW_SCRIPT: &str = r#"#!/usr/bin/env bash
set -uo pipefail
state="$MOCK_STATE"
echo "$*" >> "$state/brew_log"
touch "$state/brew_formulae" "$state/brew_casks" "$state/brew_taps" "$state/brew_fail"

case "${1:-}" in
  list)
    if [ "$#" -eq 3 ] && [ "$2" = "--formula" ]; then cat "$state/brew_formulae"; exit 0; fi
    if [ "$#" -eq 3 ] && [ "$2" = "--cask" ]; then cat "$state/brew_casks"; exit 0; fi
    if [ "$3" = "--cask" ]; then file="$state/brew_casks"; else file="$state/brew_formulae"; fi
    grep "^$4 " "$file" || exit 1
    ;;
  install)
    if [ "$2" = "--cask" ]; then name="$3"; file="$state/brew_casks"; else name="$2"; file="$state/brew_formulae"; fi
    if grep -qx "$name" "$state/brew_fail"; then echo "Error: no bottle for $name" >&2; exit 1; fi
    echo "$name 1.0.0" >> "$file"
    if [ "$name" = "demo-tools" ]; then
      printf '#!/usr/bin/env bash\necho "demo-tool: $*"\nexit "${DEMO_EXIT:-0}"\n' > "$MOCK_BIN/bert-demo-tool"
      chmod 755 "$MOCK_BIN/bert-demo-tool"
    fi
    ;;
  uninstall)
    if [ "$2" = "--cask" ]; then name="$3"; file="$state/brew_casks"; else name="$2"; file="$state/brew_formulae"; fi
    grep -v "^$name " "$file" > "$file.tmp"
    mv "$file.tmp" "$file"
    ;;
  info)
    if [ "$4" = "wget" ]; then
      echo '{"formulae":[{"name":"wget","full_name":"wget","desc":"Internet file retriever","license":"GPL-3.0-or-later","versions":{"stable":"1.24.5"},"versioned_formulae":[]}],"casks":[]}'
    elif [ "$4" = "bert-demo-tool" ]; then
      echo '{"formulae":[{"name":"demo-tools","full_name":"demo-tools","desc":"Demo","versions":{"stable":"1.0.0"},"versioned_formulae":[]}],"casks":[]}'
    else
      echo "Error: No available formula with the name \"$4\"." >&2
      exit 1
    fi
    ;;
  tap)
    if [ "$#" -eq 1 ]; then cat "$state/brew_taps"; else echo "$2" >> "$state/brew_taps"; fi
    ;;
  search)
    if [ "$2" = "--cask" ]; then echo "$3-cask"; else echo "$3-formula"; fi
    ;;
  *)
    exit 0
    ;;
esac
"#;

const NPM_SCRIPT: &str = r#"#!/usr/bin/env bash
set -uo pipefail
state="$MOCK_STATE"
echo "$*" >> "$state/npm_log"
touch "$state/npm_packages"

case "${1:-}" in
  list)
    printf '{"dependencies":{'
    first=1
    while read -r name version; do
      [ -z "$name" ] && continue
      [ "$first" -eq 0 ] && printf ','
      first=0
      printf '"%s":{"version":"%s"}' "$name" "$version"
    done < "$state/npm_packages"
    printf '}}\n'
    ;;
  install)
    pkg="$3"
    case "$pkg" in
      ?*@*) name="${pkg%@*}"; version="${pkg##*@}" ;;
      *) name="$pkg"; version="1.0.0" ;;
    esac
    echo "$name $version" >> "$state/npm_packages"
    ;;
  search)
    echo "[{\"name\":\"$3-node\",\"version\":\"1.0.0\",\"description\":\"from npm\"}]"
    ;;
  *)
    exit 0
    ;;
esac
"#;

const NODE_SCRIPT: &str = "#!/usr/bin/env bash\necho v20.0.0\n";

struct TestEnv {
    _tmp: TempDir,
    bert_home: PathBuf,
    state_dir: PathBuf,
    mock_bin_dir: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().to_path_buf();

        let bert_home = root.join("bert-home");
        let state_dir = root.join("state");
        let mock_bin_dir = root.join("bin");
        for dir in [&bert_home, &state_dir, &mock_bin_dir] {
            fs::create_dir_all(dir).expect("mkdir");
        }

        write_executable(&mock_bin_dir.join("brew"), BREW_SCRIPT);
        write_executable(&mock_bin_dir.join("npm"), NPM_SCRIPT);
        write_executable(&mock_bin_dir.join("node"), NODE_SCRIPT);

        Self {
            _tmp: tmp,
            bert_home,
            state_dir,
            mock_bin_dir,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bert"));
        cmd.env("BERT_HOME", &self.bert_home)
            .env("MOCK_STATE", &self.state_dir)
            .env("MOCK_BIN", &self.mock_bin_dir)
            .env("PATH", format!("{}:/usr/bin:/bin", self.mock_bin_dir.display()))
            .env("NO_COLOR", "1")
            .env("BERT_NPM_REGISTRY", "http://127.0.0.1:9")
            .arg("--yes");
        cmd
    }

    /// No `--yes` and no Homebrew on `PATH`.
    fn cmd_without_brew(&self) -> Command {
        let empty_bin = self.state_dir.join("empty-bin");
        fs::create_dir_all(&empty_bin).expect("mkdir");

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bert"));
        cmd.env("BERT_HOME", &self.bert_home)
            .env("MOCK_STATE", &self.state_dir)
            .env("PATH", format!("{}:/usr/bin:/bin", empty_bin.display()))
            .env("NO_COLOR", "1")
            .env("BERT_NPM_REGISTRY", "http://127.0.0.1:9");
        cmd
    }

    fn state(&self, file: &str) -> String {
        fs::read_to_string(self.state_dir.join(file)).unwrap_or_default()
    }

    fn set_state(&self, file: &str, content: &str) {
        fs::write(self.state_dir.join(file), content).expect("write state");
    }

    fn backups(&self) -> Vec<PathBuf> {
        let dir = self.bert_home.join("backups");
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        entries.map(|e| e.expect("entry").path()).collect()
    }
}

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).expect("write mock binary");
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod");
}

fn count_lines(haystack: &str, needle: &str) -> usize {
    haystack.lines().filter(|line| *line == needle).count()
}

#[test]
fn backup_then_restore_reinstalls_everything() {
    let env = TestEnv::new();
    env.set_state("brew_formulae", "git 2.44.0\nwget 1.24.5\n");
    env.set_state("brew_casks", "firefox 125.0\n");
    env.set_state("brew_taps", "homebrew/core\nacme/tools\n");
    env.set_state("npm_packages", "typescript 5.4.5\n");

    env.cmd().arg("backup").assert().success();

    let backups = env.backups();
    assert_eq!(backups.len(), 1);
    let name = backups[0].file_name().expect("name").to_string_lossy().to_string();
    assert!(name.starts_with("bert_backup_") && name.ends_with(".json"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&backups[0]).expect("read")).expect("json");
    assert_eq!(json["schema_version"], 1);
    assert_eq!(json["packages"].as_array().expect("packages").len(), 4);

    // Fresh machine: only the default tap
    env.set_state("brew_formulae", "");
    env.set_state("brew_casks", "");
    env.set_state("brew_taps", "homebrew/core\n");
    env.set_state("npm_packages", "");
    env.set_state("brew_log", "");

    env.cmd()
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore completed successfully"));

    let log = env.state("brew_log");
    assert_eq!(count_lines(&log, "tap acme/tools"), 1);
    assert_eq!(count_lines(&log, "tap homebrew/core"), 0);
    assert_eq!(count_lines(&log, "install git"), 1);
    assert_eq!(count_lines(&log, "install wget"), 1);
    assert_eq!(count_lines(&log, "install --cask firefox"), 1);
    assert!(env.state("npm_packages").contains("typescript"));
}

#[test]
fn restore_skips_what_is_already_installed() {
    let env = TestEnv::new();
    env.set_state("brew_formulae", "git 2.44.0\n");
    let backup = env.state_dir.join("snap.json");

    env.cmd()
        .args(["backup", "--output"])
        .arg(&backup)
        .assert()
        .success();

    env.set_state("brew_log", "");
    env.cmd().arg("restore").arg(&backup).assert().success();

    assert_eq!(count_lines(&env.state("brew_log"), "install git"), 0);
}

#[test]
fn restore_with_failures_exits_non_zero_and_continues() {
    let env = TestEnv::new();
    env.set_state("brew_formulae", "git 2.44.0\nwget 1.24.5\nzstd 1.5.6\n");
    env.cmd().arg("backup").assert().success();

    env.set_state("brew_formulae", "");
    env.set_state("brew_fail", "wget\n");

    env.cmd().arg("restore").assert().failure();

    let installed = env.state("brew_formulae");
    assert!(installed.contains("git"));
    assert!(installed.contains("zstd"));
    assert!(!installed.contains("wget"));
}

#[test]
fn restore_reports_unreadable_backup() {
    let env = TestEnv::new();
    let broken = env.state_dir.join("broken.json");
    fs::write(&broken, "{ not json").expect("write");

    env.cmd()
        .args(["restore", "-i"])
        .arg(&broken)
        .assert()
        .failure();
}

#[test]
fn unknown_command_is_installed_once_then_run() {
    let env = TestEnv::new();

    env.cmd()
        .args(["bert-demo-tool", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo-tool: hello"));

    env.cmd()
        .args(["bert-demo-tool", "again"])
        .env("DEMO_EXIT", "3")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("demo-tool: again"));

    assert_eq!(count_lines(&env.state("brew_log"), "install demo-tools"), 1);
}

#[test]
fn command_without_provider_fails() {
    let env = TestEnv::new();

    env.cmd()
        .arg("definitely-not-a-command-xyz")
        .assert()
        .failure();

    assert!(!env.state("brew_log").contains("install"));
}

#[test]
fn install_node_touches_only_node_backend() {
    let env = TestEnv::new();

    env.cmd()
        .args(["install", "typescript@5.4.5", "--node"])
        .assert()
        .success();

    assert!(env.state("npm_packages").contains("typescript 5.4.5"));
    assert!(!env.state("brew_log").contains("install"));
}

#[test]
fn search_and_node_search_hit_different_backends() {
    let env = TestEnv::new();

    env.cmd()
        .args(["search", "left-pad"])
        .assert()
        .success()
        .stdout(predicate::str::contains("left-pad-formula"))
        .stdout(predicate::str::contains("left-pad-node").not());

    env.cmd()
        .args(["search", "left-pad", "--node"])
        .assert()
        .success()
        .stdout(predicate::str::contains("left-pad-node"))
        .stdout(predicate::str::contains("left-pad-formula").not());
}

#[test]
fn list_json_reports_installed_packages() {
    let env = TestEnv::new();
    env.set_state("brew_formulae", "git 2.44.0\n");

    env.cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"git\""));
}

#[test]
fn set_manager_persists_choice() {
    let env = TestEnv::new();

    env.cmd().args(["set-manager", "yarn"]).assert().success();

    let config = fs::read_to_string(env.bert_home.join("config.json")).expect("config");
    assert!(config.contains("yarn"));

    env.cmd().args(["set-manager", "deno"]).assert().failure();
}

#[test]
fn install_shows_package_information_first() {
    let env = TestEnv::new();

    env.cmd()
        .args(["install", "wget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Package information"))
        .stdout(predicate::str::contains("Internet file retriever"))
        .stdout(predicate::str::contains("GPL-3.0-or-later"));

    assert!(env.state("brew_formulae").contains("wget 1.0.0"));
}

#[test]
fn uninstall_removes_and_cleans_up() {
    let env = TestEnv::new();
    env.set_state("brew_formulae", "git 2.44.0\nwget 1.24.5\n");

    env.cmd().args(["uninstall", "git"]).assert().success();

    let log = env.state("brew_log");
    assert_eq!(count_lines(&log, "uninstall git"), 1);
    assert_eq!(count_lines(&log, "cleanup git"), 1);
    assert_eq!(env.state("brew_formulae"), "wget 1.24.5\n");
}

#[test]
fn uninstall_of_missing_package_only_warns() {
    let env = TestEnv::new();

    env.cmd()
        .args(["uninstall", "htop"])
        .assert()
        .success()
        .stderr(predicate::str::contains("htop is not installed"));

    let log = env.state("brew_log");
    assert_eq!(count_lines(&log, "uninstall htop"), 0);
    assert_eq!(count_lines(&log, "cleanup htop"), 0);
}

#[test]
fn closed_stdin_declines_homebrew_install() {
    let env = TestEnv::new();

    env.cmd_without_brew()
        .args(["install", "wget"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("assuming no"))
        .stdout(predicate::str::contains("Installing Homebrew").not());
}

#[test]
fn restore_asks_for_homebrew_once() {
    let env = TestEnv::new();
    let backup = env.state_dir.join("legacy.json");
    fs::write(
        &backup,
        r#"{"created_at":"2024-03-01T10:15:00Z","formulas":[{"name":"git"},{"name":"wget"},{"name":"zstd"}]}"#,
    )
    .expect("write");

    let output = env
        .cmd_without_brew()
        .arg("restore")
        .arg(&backup)
        .output()
        .expect("run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Would you like to install Homebrew").count(), 1);
}

#[test]
fn legacy_blank_versions_restore_latest_when_pinning() {
    let env = TestEnv::new();
    let backup = env.state_dir.join("legacy.json");
    fs::write(
        &backup,
        r#"{"created_at":"2024-03-01T10:15:00Z","formulas":[{"name":"git","version":""}]}"#,
    )
    .expect("write");

    env.cmd()
        .args(["restore", "--pin-versions"])
        .arg(&backup)
        .assert()
        .success();

    assert_eq!(count_lines(&env.state("brew_log"), "install git"), 1);
}
