mod common;

use ccc_core::CccError;
use ccc_data::{extract_bvd_summary, extract_parameter, file_sha256, BvdFile, DriveConfig};
use tempfile::tempdir;

use common::{bvd_text, cfg_text, write};

#[test]
fn label_lookup_reads_file() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "run_bvd.txt", &bvd_text(30, "0.5"));
    let path = dir.path().join("run_bvd.txt");
    assert_eq!(
        extract_parameter(&path, "R1 Info", ":").expect("extract").as_deref(),
        Some("R100")
    );
    assert_eq!(extract_parameter(&path, "R3 Info", ":").expect("extract"), None);
}

#[test]
fn summary_reads_trailing_row() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "run_bvd.txt", &bvd_text(30, "0.5"));
    let summary = extract_bvd_summary(&dir.path().join("run_bvd.txt")).expect("summary");
    assert_eq!(summary.averages, 30);
    assert_eq!(summary.value, 1.234e-6);
    assert_eq!(summary.std_dev, 5.6e-9);
}

#[test]
fn zero_averages_fail_before_trailing_row() {
    let dir = tempdir().expect("tempdir");
    // The trailing row is unparsable; the count check must fire first.
    let text = bvd_text(0, "0.5").replace("avg     --         1.234e-6    5.6e-9", "garbage");
    write(dir.path(), "run_bvd.txt", &text);
    let err = extract_bvd_summary(&dir.path().join("run_bvd.txt")).unwrap_err();
    assert!(matches!(err, CccError::Data(_)));
    assert_eq!(err.info().code, "ccc_data.bvd_averages");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = extract_parameter(&dir.path().join("absent.txt"), "R1 Info", ":").unwrap_err();
    assert!(matches!(err, CccError::Io(_)));
}

#[test]
fn bvd_record_collects_ratio_fields() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "run_bvd.txt", &bvd_text(30, "0.5"));
    let record = BvdFile::load(&dir.path().join("run_bvd.txt")).expect("load");
    assert_eq!(record.averages, 30);
    assert_eq!(record.r1_name, "R100");
    assert_eq!(record.r2_name, "R1");
    assert_eq!(record.k_mturns, 0.5);
    assert_eq!(record.i2r2, 1.0);
    assert_eq!((record.n1, record.n2, record.na), (2000, 20, 1));
    assert_eq!((record.r1_nominal, record.r2_nominal), (100.0, 1.0));
    assert_eq!(record.stop_time.as_deref(), Some("11:58:40"));
    assert_eq!(record.summary.value, 1.234e-6);
}

#[test]
fn bvd_record_reports_bad_field() {
    let dir = tempdir().expect("tempdir");
    let text = bvd_text(30, "0.5").replace("N1 (Turns): 2000", "N1 (Turns): lots");
    write(dir.path(), "run_bvd.txt", &text);
    let err = BvdFile::load(&dir.path().join("run_bvd.txt")).unwrap_err();
    assert_eq!(err.info().code, "ccc_data.field_value");
    assert_eq!(
        err.info().context.get("label").map(String::as_str),
        Some("N1 (Turns)")
    );
}

#[test]
fn drive_config_flags_and_range_code() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "run.cfg", &cfg_text("TRUE", "FALSE", "3"));
    let config = DriveConfig::load(&dir.path().join("run.cfg")).expect("load");
    assert_eq!(config.cal_mode, Some(true));
    assert_eq!(config.cn_short, Some(false));
    assert_eq!(config.range_shunt.as_deref(), Some("3"));
    assert!(config.is_cn_calibration());

    write(dir.path(), "short.cfg", &cfg_text("TRUE", "TRUE", "3"));
    let shorted = DriveConfig::load(&dir.path().join("short.cfg")).expect("load");
    assert!(!shorted.is_cn_calibration());
}

#[test]
fn digest_is_stable() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "a.txt", "abc");
    assert_eq!(
        file_sha256(&dir.path().join("a.txt")).expect("digest"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}
