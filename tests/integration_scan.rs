// tests/integration_scan.rs
//! End-to-end scans over real temporary directory trees.

use deadwood_core::classify::FileType;
use deadwood_core::config::ScanConfig;
use deadwood_core::engine::Engine;
use deadwood_core::error::DeadwoodError;
use deadwood_core::vcs::{FixedOracle, VcsStatus};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

#[test]
fn scan_finds_backup_twin_and_prunes_noise() {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();

    let widget = "export function Widget() {\n  return null;\n}\nexport default Widget;\n";
    write(root, "src/App.tsx", "import Widget from './components/Widget';\n");
    write(root, "src/components/Widget.tsx", widget);
    write(root, "src/components/Widget.backup.tsx", widget);
    // Pruned directory and filtered extension: neither may appear in output.
    write(root, "node_modules/pkg/index.js", "module.exports = {};\n");
    fs::write(root.join("logo.png"), [0x89u8, 0x50, 0x4e, 0x47]).expect("write png");

    let oracle = FixedOracle::new()
        .with("src/App.tsx", VcsStatus::Tracked)
        .with("src/components/Widget.tsx", VcsStatus::Tracked)
        .with("src/components/Widget.backup.tsx", VcsStatus::Untracked);

    let report = Engine::new(ScanConfig::new(vec![root.to_path_buf()]))
        .run(&oracle)
        .expect("scan succeeds");

    assert_eq!(report.summary.total_files, 3);
    assert!(report
        .classifications
        .iter()
        .all(|c| !c.path.starts_with("node_modules")));

    let backup = report
        .classifications
        .iter()
        .find(|c| c.path == PathBuf::from("src/components/Widget.backup.tsx"))
        .expect("backup classified");
    assert_eq!(backup.file_type, FileType::Backup);
    assert!(backup.confidence >= 80);
    assert_eq!(
        backup.related_file,
        Some(PathBuf::from("src/components/Widget.tsx"))
    );

    // Most actionable first.
    assert_eq!(report.classifications[0].file_type, FileType::Backup);

    assert_eq!(report.duplicate_groups.len(), 1);
    assert_eq!(report.duplicate_groups[0].members.len(), 2);
}

#[test]
fn unreadable_file_becomes_error_entry_and_scan_continues() {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();

    write(root, "src/fine.ts", "export const fine = 1;\n");
    fs::create_dir_all(root.join("src")).expect("mkdir");
    fs::write(root.join("src/garbled.ts"), [0xffu8, 0xfe, 0x00, 0x9f]).expect("write bytes");

    let report = Engine::new(ScanConfig::new(vec![root.to_path_buf()]))
        .run(&FixedOracle::new())
        .expect("scan succeeds despite bad file");

    assert_eq!(report.summary.total_files, 2);
    let error = report
        .classifications
        .iter()
        .find(|c| c.file_type == FileType::Error)
        .expect("error entry present");
    assert_eq!(error.path, PathBuf::from("src/garbled.ts"));
    assert_eq!(error.confidence, 0);
    assert_eq!(report.summary.by_type.get("error"), Some(&1));
}

#[test]
fn missing_root_is_a_fatal_configuration_error() {
    let config = ScanConfig::new(vec![PathBuf::from("/definitely/not/here/deadwood")]);
    let err = Engine::new(config)
        .run(&FixedOracle::new())
        .expect_err("must fail before output");
    assert!(matches!(err, DeadwoodError::RootUnreadable { .. }));
}

#[test]
fn config_overlay_narrows_extensions() {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();

    write(root, "deadwood.toml", "[scan]\nextensions = [\"ts\"]\n");
    write(root, "src/kept.ts", "export const kept = 1;\n");
    write(root, "src/skipped.css", ".a { color: red; }\n");

    let mut config = ScanConfig::new(vec![root.to_path_buf()]);
    config.load_overlay().expect("overlay parses");

    let report = Engine::new(config)
        .run(&FixedOracle::new())
        .expect("scan succeeds");

    let paths: Vec<&PathBuf> = report.classifications.iter().map(|c| &c.path).collect();
    assert!(paths.contains(&&PathBuf::from("src/kept.ts")));
    assert!(!paths.contains(&&PathBuf::from("src/skipped.css")));
}

#[test]
fn scan_twice_yields_identical_classifications() {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();

    let content = "export const stable = true;\n";
    write(root, "src/a.ts", content);
    write(root, "src/a.backup.ts", content);
    write(root, "src/example-usage.ts", "const demo = 0;\n");

    let run = || {
        Engine::new(ScanConfig::new(vec![root.to_path_buf()]))
            .run(&FixedOracle::new())
            .expect("scan succeeds")
    };
    let first = run();
    let second = run();

    let shape = |r: &deadwood_core::report::Report| {
        r.classifications
            .iter()
            .map(|c| (c.path.clone(), c.file_type.label(), c.confidence, c.reasons.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), shape(&second));
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_surfaces_as_error_entry() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    write(root, "src/fine.ts", "export const fine = 1;\n");
    write(root, "src/locked/hidden.ts", "export const hidden = 1;\n");

    let locked = root.join("src/locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
    if fs::read_dir(&locked).is_ok() {
        // Privileged user: permission bits are not enforced, nothing to test.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");
        return;
    }

    let result = Engine::new(ScanConfig::new(vec![root.to_path_buf()])).run(&FixedOracle::new());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

    let report = result.expect("scan succeeds despite unreadable directory");
    let error = report
        .classifications
        .iter()
        .find(|c| c.file_type == FileType::Error)
        .expect("walk error surfaces in the report");
    assert_eq!(error.path, PathBuf::from("src/locked"));

    let fine = report
        .classifications
        .iter()
        .find(|c| c.path == PathBuf::from("src/fine.ts"))
        .expect("rest of the tree still scanned");
    assert_eq!(fine.file_type, FileType::Active);
}

#[test]
fn multiple_roots_keep_colliding_relative_paths_distinct() {
    let dir_a = TempDir::new().expect("tempdir a");
    let dir_b = TempDir::new().expect("tempdir b");
    let content = "export function shared() {\n  return 1;\n}\n";
    write(dir_a.path(), "src/same.ts", content);
    write(dir_b.path(), "src/same.ts", content);

    let config = ScanConfig::new(vec![dir_a.path().to_path_buf(), dir_b.path().to_path_buf()]);
    let report = Engine::new(config)
        .run(&FixedOracle::new())
        .expect("scan succeeds");

    assert_eq!(report.summary.total_files, 2);
    assert_ne!(
        report.classifications[0].path,
        report.classifications[1].path
    );

    // The identical twins still pair up, as two distinct files.
    assert_eq!(report.duplicate_groups.len(), 1);
    let members = &report.duplicate_groups[0].members;
    assert_eq!(members.len(), 2);
    assert_ne!(members[0], members[1]);
}

#[test]
fn json_report_includes_untracked_status_from_oracle_default() {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    write(root, "src/a.ts", "export const a = 1;\n");

    // FixedOracle with no entries: every lookup falls back to untracked.
    let report = Engine::new(ScanConfig::new(vec![root.to_path_buf()]))
        .run(&FixedOracle::new())
        .expect("scan succeeds");

    assert_eq!(report.summary.by_vcs_status.get("untracked"), Some(&1));
    let active = &report.classifications[0];
    assert_eq!(active.file_type, FileType::Active);
    assert_eq!(active.confidence, 20);
}
