//! End-to-end headless runs through the public library API.

use std::io::Write;

use clap::Parser;
use vsort::{AppConfig, AppError, Cli, run, run_headless};
use vsort_core::{BufferKind, ConfigError, RunReport, SortAlgorithm};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const SMALL: &str = r#"
primary_size = 64
mini_size = 16
pause_ms = 0
seed = 2024
max_rounds = 1
"#;

#[test]
fn headless_run_from_config_file_succeeds() {
    let file = write_config(SMALL);
    let cli = Cli::try_parse_from([
        "vsort",
        "--headless",
        "--config",
        file.path().to_str().unwrap(),
    ])
    .unwrap();

    run(cli).unwrap();
}

#[test]
fn flags_win_over_the_file() {
    let file = write_config(SMALL);
    let cli = Cli::try_parse_from([
        "vsort",
        "--config",
        file.path().to_str().unwrap(),
        "--mini-size",
        "8",
        "--rounds",
        "2",
    ])
    .unwrap();

    let config = AppConfig::resolve(&cli).unwrap();
    assert_eq!(config.engine.primary_size, 64);
    assert_eq!(config.engine.mini_size, 8);
    assert_eq!(config.engine.max_rounds, Some(2));

    let mut out = Vec::new();
    run_headless(config.engine, true, &mut out).unwrap();
    let reports: Vec<RunReport> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(reports.len(), 10);
    assert!(reports[..5].iter().all(|r| r.round == 0));
    assert!(reports[5..].iter().all(|r| r.round == 1));
    let insertion = &reports[9];
    assert_eq!(insertion.algorithm, SortAlgorithm::Insertion);
    assert_eq!(insertion.target, BufferKind::Mini);
    assert_eq!(insertion.len, 8);
    assert_eq!(insertion.stats.swaps, insertion.stats.snapshots);
}

#[test]
fn same_seed_same_reports() {
    let file = write_config(SMALL);
    let cli = Cli::try_parse_from(["vsort", "--config", file.path().to_str().unwrap()]).unwrap();
    let config = AppConfig::resolve(&cli).unwrap();

    let stats = |config: AppConfig| {
        let mut out = Vec::new();
        run_headless(config.engine, true, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<RunReport>(line).unwrap().stats)
            .collect::<Vec<_>>()
    };
    assert_eq!(stats(config.clone()), stats(config));
}

#[test]
fn missing_config_file_is_a_config_error() {
    let cli = Cli::try_parse_from(["vsort", "--headless", "--config", "/nonexistent/vsort.toml"])
        .unwrap();
    let err = run(cli).unwrap_err();
    assert!(matches!(err, AppError::Config(ConfigError::Io { .. })));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn empty_schedule_is_rejected() {
    let file = write_config("schedule = []\n");
    let cli = Cli::try_parse_from(["vsort", "--config", file.path().to_str().unwrap()]).unwrap();
    assert!(matches!(
        AppConfig::resolve(&cli),
        Err(ConfigError::EmptySchedule)
    ));
}
