use std::fs;
use std::time::Duration;

use ccc_temp::{
    read_channels, run_logger, CsvLog, LoggerConfig, ManualClock, ScriptedInstrument,
};
use chrono::{Local, TimeZone};
use tempfile::tempdir;

fn clock() -> ManualClock {
    ManualClock::starting_at(Local.with_ymd_and_hms(2026, 1, 16, 9, 30, 0).unwrap())
}

fn config(iterations: u32) -> LoggerConfig {
    LoggerConfig {
        channels: vec!["A".into(), "B".into()],
        iterations,
        interval_secs: 30.0,
        query_delay_ms: 100,
        ..LoggerConfig::default()
    }
}

#[test]
fn writes_header_once_and_one_row_per_cycle() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("temps.csv");
    let config = config(3);
    let mut instr = ScriptedInstrument::new(["4.21", "77.3", "4.22", "77.4", "4.23", "77.5"]);
    let mut clock = clock();
    let mut log = CsvLog::append_to(&path, &config.channels).expect("open");

    let mut seen = Vec::new();
    let summary = run_logger(&mut instr, &mut clock, &mut log, &config, |cycle, row| {
        seen.push((cycle, row.readings.len()));
    })
    .expect("run");
    drop(log);

    assert_eq!(summary.cycles, 3);
    assert_eq!(seen, [(1, 2), (2, 2), (3, 2)]);
    assert_eq!(
        instr.commands(),
        ["KRDG? A", "KRDG? B", "KRDG? A", "KRDG? B", "KRDG? A", "KRDG? B"]
    );

    let contents = fs::read_to_string(&path).expect("read csv");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Time,A(K),B(K)");
    assert_eq!(lines[1], "2026-01-16 09:30:00,4.21,77.3");
    assert!(lines[3].ends_with(",4.23,77.5"));
}

#[test]
fn sleeps_interval_between_cycles_only() {
    let dir = tempdir().expect("tempdir");
    let config = config(4);
    let mut instr = ScriptedInstrument::new(["1", "2"].repeat(4));
    let mut clock = clock();
    let mut log =
        CsvLog::append_to(&dir.path().join("temps.csv"), &config.channels).expect("open");
    let summary = run_logger(&mut instr, &mut clock, &mut log, &config, |_, _| {}).expect("run");

    let interval = Duration::from_secs(30);
    let delay = Duration::from_millis(100);
    let interval_sleeps = clock.sleeps().iter().filter(|d| **d == interval).count();
    let delay_sleeps = clock.sleeps().iter().filter(|d| **d == delay).count();
    assert_eq!(interval_sleeps, 3);
    assert_eq!(delay_sleeps, 8);
    assert_eq!(clock.sleeps().last(), Some(&delay));

    // One timestamp per cycle, taken at the start of the cycle.
    let first = summary.first.expect("first");
    let last = summary.last.expect("last");
    let elapsed = (last - first).num_milliseconds();
    assert_eq!(elapsed, 3 * (30_000 + 200));
}

#[test]
fn appending_to_existing_log_skips_header() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("temps.csv");
    let config = config(1);
    for value in ["5.0", "6.0"] {
        let mut instr = ScriptedInstrument::new([value, value]);
        let mut clock = clock();
        let mut log = CsvLog::append_to(&path, &config.channels).expect("open");
        run_logger(&mut instr, &mut clock, &mut log, &config, |_, _| {}).expect("run");
    }
    let contents = fs::read_to_string(&path).expect("read csv");
    let headers = contents.lines().filter(|line| line.starts_with("Time")).count();
    assert_eq!(headers, 1);
    assert_eq!(contents.lines().count(), 3);
}

#[test]
fn empty_existing_file_gets_header() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("temps.csv");
    fs::write(&path, "").expect("touch");
    let config = config(1);
    let mut instr = ScriptedInstrument::new(["1", "2"]);
    let mut log = CsvLog::append_to(&path, &config.channels).expect("open");
    run_logger(&mut instr, &mut clock(), &mut log, &config, |_, _| {}).expect("run");
    drop(log);
    let contents = fs::read_to_string(&path).expect("read csv");
    assert!(contents.starts_with("Time,A(K),B(K)\n"));
}

#[test]
fn failed_query_stops_the_run() {
    let config = config(3);
    // Enough responses for one and a half cycles.
    let mut instr = ScriptedInstrument::new(["1", "2", "3"]);
    let mut clock = clock();
    let mut log = CsvLog::from_writer(Vec::new(), &config.channels, true).expect("log");
    let err = run_logger(&mut instr, &mut clock, &mut log, &config, |_, _| {}).unwrap_err();
    assert_eq!(err.info().code, "ccc_temp.read");
    assert_eq!(err.info().context.get("channel").map(String::as_str), Some("B"));

    let written = String::from_utf8(log.into_inner().expect("inner")).expect("utf8");
    assert_eq!(written.lines().count(), 2);
}

#[test]
fn mismatched_columns_are_rejected() {
    let config = config(1);
    let mut instr = ScriptedInstrument::new(["1", "2"]);
    let mut log = CsvLog::from_writer(Vec::new(), &["A".to_string()], true).expect("log");
    let err = run_logger(&mut instr, &mut clock(), &mut log, &config, |_, _| {}).unwrap_err();
    assert_eq!(err.info().code, "ccc_temp.channels");
    assert!(instr.commands().is_empty());
}

#[test]
fn test_pass_reads_every_channel() {
    let channels: Vec<String> = ["A", "B", "C1", "C2"].iter().map(|c| c.to_string()).collect();
    let mut instr = ScriptedInstrument::new(["4.2", "4.3", "77.1", "295.0"]);
    let mut clock = clock();
    let readings =
        read_channels(&mut instr, &mut clock, &channels, Duration::from_millis(100)).expect("read");
    let lines: Vec<String> = readings.iter().map(|r| r.to_string()).collect();
    assert_eq!(lines, ["A = 4.2 K", "B = 4.3 K", "C1 = 77.1 K", "C2 = 295 K"]);
    assert_eq!(clock.sleeps().len(), 4);
}

#[test]
fn oversized_interval_fails_before_polling() {
    let config = LoggerConfig {
        interval_secs: 1.0e20,
        ..config(2)
    };
    let mut instr = ScriptedInstrument::new(["1", "2", "3", "4"]);
    let mut log = CsvLog::from_writer(Vec::new(), &config.channels, true).expect("log");
    let err = run_logger(&mut instr, &mut clock(), &mut log, &config, |_, _| {}).unwrap_err();
    assert_eq!(err.info().code, "ccc_temp.interval");
    assert!(instr.commands().is_empty());
}
