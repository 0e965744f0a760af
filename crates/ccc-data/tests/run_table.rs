mod common;

use ccc_data::{list_data_dirs, require_eligible, resolve_run, scan_eligible, RunTable};
use tempfile::tempdir;

use common::{bvd_text, cfg_text, write};

#[test]
fn groups_files_by_run_number() {
    let table = RunTable::from_names([
        "260203_001_1127_bvd.txt",
        "260203_001_1127_cccdrive.cfg",
        "260203_001_1127.txt",
        "260203_002_1204_bvd.txt",
        "260203_003.txt",
        "README.md",
    ]);
    assert_eq!(table.len(), 2);

    let first = table.get("001").expect("run 001");
    assert_eq!(first.bvd_file.as_deref(), Some("260203_001_1127_bvd.txt"));
    assert_eq!(first.cfg_file.as_deref(), Some("260203_001_1127_cccdrive.cfg"));
    assert!(first.is_complete());

    let second = table.get("002").expect("run 002");
    assert_eq!(second.bvd_file.as_deref(), Some("260203_002_1204_bvd.txt"));
    assert_eq!(second.cfg_file, None);
    assert!(table.get("003").is_none());
}

#[test]
fn unknown_types_register_the_run_without_files() {
    let table = RunTable::from_names(["260203_004_1300_ccclog.txt"]);
    let record = table.get("004").expect("run 004");
    assert_eq!(record.bvd_file, None);
    assert_eq!(record.cfg_file, None);
}

#[test]
fn scans_directory_for_eligible_runs() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "260203_001_1127_bvd.txt", &bvd_text(30, "0.5"));
    write(dir.path(), "260203_001_1127_cccdrive.cfg", &cfg_text("TRUE", "FALSE", "1"));
    write(dir.path(), "260203_002_1204_bvd.txt", &bvd_text(30, "0.5"));
    write(dir.path(), "260203_002_1204_cccdrive.cfg", &cfg_text("FALSE", "FALSE", "1"));
    write(dir.path(), "260203_003_1301_bvd.txt", &bvd_text(0, "0.5"));
    write(dir.path(), "260203_003_1301_cccdrive.cfg", &cfg_text("TRUE", "FALSE", "1"));
    write(dir.path(), "260203_004_1400_bvd.txt", &bvd_text(12, "0.5"));
    write(dir.path(), "260203_004_1400_cccdrive.cfg", &cfg_text("TRUE", "TRUE", "1"));
    write(dir.path(), "260203_005_1500_bvd.txt", &bvd_text(12, "0.5"));

    let table = RunTable::from_dir(dir.path()).expect("table");
    assert_eq!(table.len(), 5);
    let eligible = scan_eligible(dir.path(), &table).expect("scan");
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].run_number, "001");
    assert_eq!(eligible[0].averages, 30);
    assert_eq!(
        eligible[0].describe(),
        "calmode = TRUE, CN mode is ON, n_bvd is non-zero (30)."
    );
    require_eligible(dir.path(), &eligible).expect("non-empty");
}

#[test]
fn empty_eligible_list_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let err = require_eligible(dir.path(), &[]).unwrap_err();
    assert_eq!(err.info().code, "ccc_data.no_eligible_runs");
}

#[test]
fn resolves_selected_run_paths() {
    let dir = tempdir().expect("tempdir");
    let table = RunTable::from_names(["260203_001_1127_bvd.txt", "260203_001_1127_cccdrive.cfg"]);
    let (bvd, cfg) = resolve_run(dir.path(), &table, "001").expect("resolve");
    assert_eq!(bvd, dir.path().join("260203_001_1127_bvd.txt"));
    assert_eq!(cfg, dir.path().join("260203_001_1127_cccdrive.cfg"));

    let err = resolve_run(dir.path(), &table, "009").unwrap_err();
    assert_eq!(err.info().code, "ccc_data.unknown_run");
}

#[test]
fn lists_only_dated_directories() {
    let root = tempdir().expect("tempdir");
    std::fs::create_dir(root.path().join("260203")).expect("dir");
    std::fs::create_dir(root.path().join("260130")).expect("dir");
    std::fs::create_dir(root.path().join("old.backup")).expect("dir");
    write(root.path(), "notes", "not a directory");
    let dirs = list_data_dirs(root.path()).expect("list");
    assert_eq!(dirs, vec!["260130".to_string(), "260203".to_string()]);
}

#[test]
fn unreadable_flags_skip_only_that_run() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "260203_001_1127_bvd.txt", &bvd_text(30, "0.5"));
    write(dir.path(), "260203_001_1127_cccdrive.cfg", &cfg_text("MAYBE", "FALSE", "1"));
    write(dir.path(), "260203_002_1204_bvd.txt", &bvd_text(30, "0.5"));
    write(dir.path(), "260203_002_1204_cccdrive.cfg", &cfg_text("TRUE", "FALSE", "1"));
    let garbled = bvd_text(30, "0.5").replace("bvd averages: 30", "bvd averages: n/a");
    write(dir.path(), "260203_003_1301_bvd.txt", &garbled);
    write(dir.path(), "260203_003_1301_cccdrive.cfg", &cfg_text("TRUE", "FALSE", "1"));

    let table = RunTable::from_dir(dir.path()).expect("table");
    let eligible = scan_eligible(dir.path(), &table).expect("scan");
    let runs: Vec<&str> = eligible.iter().map(|run| run.run_number.as_str()).collect();
    assert_eq!(runs, ["002"]);
}
