use convbench::config::*;
use convbench::error::*;
use convbench::harness;
use convbench::invoke::*;
use convbench::layout::Layout;
use convbench::params::*;
use convbench::table;
use std::collections::HashSet;
use std::time::Duration;

fn finished(success: bool, elapsed: Duration) -> InvocationResult {
    InvocationResult {
        success,
        exit_code: Some(if success { 0 } else { 1 }),
        stdout: String::new(),
        stderr: String::new(),
        elapsed,
    }
}

fn config_in(root: &std::path::Path, sweep: SweepParameters) -> Config {
    Config {
        layout: Layout::rooted(root),
        build: BuildConfig {
            command: vec![],
            required: false,
        },
        sweep,
        ..Config::new()
    }
}

fn one_image() -> SweepParameters {
    SweepParameters {
        block_sizes: vec![16],
        grid_shapes: vec![GridShape::new(10, 10)],
        modes: vec![MemoryMode::Global, MemoryMode::Shared],
        images: vec![ImageSpec::new("a.png", 64, 64)],
    }
}

#[test]
fn single_image_both_modes() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), one_image());
    let launcher = |_: &Invocation| -> Result<InvocationResult> {
        Ok(finished(true, Duration::from_millis(3)))
    };

    let session = harness::run_session(&config, launcher, false).unwrap();
    let records = &session.outcome.records;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].mode.label(), "Global");
    assert_eq!(records[1].mode.label(), "Shared");
    assert_eq!(session.outcome.successful(), 2);
    assert_eq!(session.exit_status(), harness::EXIT_OK);

    let rows = table::read_records(&session.table).unwrap();
    assert_eq!(rows.len(), 2);

    // One image x one block size, plus the average
    assert_eq!(session.charts.len(), 2);
    assert!(session.charts.iter().all(|p| p.is_file()));
    assert!(config.layout.average_table_path().is_file());
    assert!(config
        .layout
        .chart_path("a.png", 16)
        .ends_with("a_block_16_performance.png"));
}

#[test]
fn full_default_sweep() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), SweepParameters::default());
    let mut seen = Vec::new();
    let launcher = |i: &Invocation| -> Result<InvocationResult> {
        seen.push(i.args.clone());
        Ok(finished(true, Duration::from_micros(seen.len() as u64)))
    };

    let session = harness::run_session(&config, launcher, false).unwrap();
    let records = &session.outcome.records;
    assert_eq!(records.len(), 72);
    assert_eq!(seen.len(), 72);
    assert!(records.iter().all(|r| r.execution_time >= 0.0));

    for combination in config.sweep.combinations() {
        let n = records.iter().filter(|r| r.matches(&combination)).count();
        assert_eq!(n, 1);
    }

    let rows = table::read_records(&session.table).unwrap();
    assert_eq!(rows.len(), records.len());
    let unique: HashSet<_> = rows
        .iter()
        .map(|r| (r.image.clone(), r.mode, r.block_size, r.grid_shape))
        .collect();
    assert_eq!(unique.len(), 72);

    // 3 images x 3 block sizes, plus the average
    assert_eq!(session.charts.len(), 10);

    // Output names are unique per combination
    let outputs: HashSet<_> = seen.iter().map(|args| args[1].clone()).collect();
    assert_eq!(outputs.len(), 72);
}

#[test]
fn always_failing_binary() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), one_image());
    let launcher = |_: &Invocation| -> Result<InvocationResult> {
        Ok(finished(false, Duration::from_millis(1)))
    };

    let session = harness::run_session(&config, launcher, false).unwrap();
    assert_eq!(session.outcome.records.len(), 2);
    assert_eq!(session.outcome.successful(), 0);
    assert_eq!(session.outcome.failed(), 2);

    let rows = table::read_records(&session.table).unwrap();
    assert!(rows.iter().all(|r| !r.success && r.exit_code == Some(1)));
    assert_eq!(session.charts.len(), 2);
    assert_eq!(session.exit_status(), harness::EXIT_RUNS_FAILED);

    // No successful runs, the averages table is just its header
    let averages =
        std::fs::read_to_string(config.layout.average_table_path()).unwrap();
    assert_eq!(averages, "Mode,Grid Shape,Mean Execution Time,Samples\n");
}

#[test]
fn exit_status_follows_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), one_image());
    let mut calls = 0;
    let launcher = |_: &Invocation| -> Result<InvocationResult> {
        calls += 1;
        Ok(finished(calls == 1, Duration::from_millis(1)))
    };
    let session = harness::run_session(&config, launcher, false);
    assert_eq!(harness::exit_status(&session), harness::EXIT_RUNS_FAILED);

    let launcher = |_: &Invocation| -> Result<InvocationResult> {
        Ok(finished(true, Duration::from_millis(1)))
    };
    let session = harness::run_session(&config, launcher, false);
    assert_eq!(harness::exit_status(&session), harness::EXIT_OK);

    let mut aborting = config_in(dir.path(), one_image());
    aborting.on_failure = FailurePolicy::Abort;
    let launcher = |_: &Invocation| -> Result<InvocationResult> {
        Ok(finished(false, Duration::ZERO))
    };
    let session = harness::run_session(&aborting, launcher, false);
    assert_eq!(harness::exit_status(&session), harness::EXIT_FATAL);
}

#[test]
fn always_failing_binary_with_abort() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), one_image());
    config.on_failure = FailurePolicy::Abort;
    let launcher = |_: &Invocation| -> Result<InvocationResult> {
        Ok(finished(false, Duration::ZERO))
    };

    let err = harness::run_session(&config, launcher, false).unwrap_err();
    assert!(matches!(err, Error::RunFailed { .. }));
    assert!(!config.layout.table_path().exists());
}

#[test]
fn invalid_config_rejected_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let mut sweep = one_image();
    sweep.modes = vec![MemoryMode::Global, MemoryMode::Global];
    let config = config_in(dir.path(), sweep);
    let launcher = |_: &Invocation| -> Result<InvocationResult> {
        panic!("nothing should run")
    };

    let session = harness::run_session(&config, launcher, false);
    assert_eq!(harness::exit_status(&session), harness::EXIT_FATAL);
    assert!(matches!(session.unwrap_err(), Error::InvalidConfig(_)));
}

#[test]
fn replot_from_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), SweepParameters::default());
    let launcher = |_: &Invocation| -> Result<InvocationResult> {
        Ok(finished(true, Duration::from_millis(2)))
    };
    let session = harness::run_session(&config, launcher, true).unwrap();
    assert!(session.outcome.build.is_none());

    std::fs::remove_dir_all(&config.layout.graphs_dir).unwrap();
    let charts = harness::replot(&config).unwrap();
    assert_eq!(charts, session.charts);
    assert!(charts.iter().all(|p| p.is_file()));
}
