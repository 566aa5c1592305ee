use crate::config::Config;
use crate::error::*;
use crate::invoke::Launcher;
use crate::report;
use crate::sweep::*;
use crate::table;
use std::path::PathBuf;

/// Process exit status when every run succeeded.
pub const EXIT_OK: u8 = 0;
/// Configuration, build or I/O error, the session did not complete.
pub const EXIT_FATAL: u8 = 1;
/// The sweep completed but some runs failed.
pub const EXIT_RUNS_FAILED: u8 = 2;

/// Results of a full session, sweep plus written files.
#[derive(Debug)]
pub struct Session {
    pub outcome: SweepOutcome,
    pub table: PathBuf,
    pub charts: Vec<PathBuf>,
}

impl Session {
    pub fn exit_status(&self) -> u8 {
        if self.outcome.failed() > 0 {
            EXIT_RUNS_FAILED
        } else {
            EXIT_OK
        }
    }
}

pub fn exit_status(session: &Result<Session>) -> u8 {
    match session {
        Ok(session) => session.exit_status(),
        Err(_) => EXIT_FATAL,
    }
}

/// Check the catalog against the input directory.
/// Problems are logged, the runs themselves will record the failure.
pub fn preflight(config: &Config) -> usize {
    let mut problems = 0;
    for image in &config.sweep.images {
        let path = config.layout.input_path(image);
        match image::image_dimensions(&path) {
            Ok((w, h)) if (w, h) != (image.width, image.height) => {
                log::warn!(
                    "{path:?} is {w}x{h}, catalog says {}x{}",
                    image.width,
                    image.height
                );
                problems += 1;
            }
            Ok(_) => log::debug!("Found {path:?}"),
            Err(e) => {
                log::warn!("Cannot read input image {path:?}: {e}");
                problems += 1;
            }
        }
    }
    problems
}

/// Everything after configuration: directories, build, sweep, table, charts.
pub fn run_session<L: Launcher>(
    config: &Config,
    launcher: L,
    skip_build: bool,
) -> Result<Session> {
    config.validate()?;
    config.layout.ensure_output_dirs()?;
    preflight(config);

    log::info!(
        "Sweeping {} combinations with {:?}",
        config.sweep.len(),
        config.binary
    );
    let outcome = SweepRunner::new(config, launcher).run(skip_build)?;
    outcome.print_report();

    let table = config.layout.table_path();
    table::write_records(&outcome.records, &table)?;
    let charts = report::write_report(&outcome.records, &config.layout)?;
    Ok(Session {
        outcome,
        table,
        charts,
    })
}

/// Re-render charts from a table written by an earlier session.
pub fn replot(config: &Config) -> Result<Vec<PathBuf>> {
    config.layout.ensure_output_dirs()?;
    let records = table::read_records(&config.layout.table_path())?;
    log::info!("Loaded {} records", records.len());
    report::write_report(&records, &config.layout)
}
