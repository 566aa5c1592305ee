//! The benchmark driver.
//!
//! Builds the binary once, then walks every combination of the sweep
//! parameters strictly one after another, timing each invocation.

use crate::config::*;
use crate::error::*;
use crate::invoke::*;
use crate::record::RunRecord;

/// Everything a finished sweep produced.
#[derive(Clone, Debug, Default)]
pub struct SweepOutcome {
    /// `None` when the build step was skipped or there is no build
    /// command.
    pub build: Option<InvocationResult>,

    /// One record per combination, in sweep order.
    pub records: Vec<RunRecord>,
}

impl SweepOutcome {
    pub fn successful(&self) -> usize {
        self.records.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.successful()
    }

    /// Seconds spent in successful runs only.
    pub fn successful_time(&self) -> f64 {
        self.records
            .iter()
            .filter(|r| r.success)
            .map(|r| r.execution_time)
            .sum()
    }

    pub fn print_report(&self) {
        log::info!(
            "Sweep finished: {} runs, {} ok, {} failed",
            self.records.len(),
            self.successful(),
            self.failed()
        );
        log::info!("Time in successful runs: {:.3}s", self.successful_time());
    }
}

pub struct SweepRunner<'a, L: Launcher> {
    config: &'a Config,
    launcher: L,
}

impl<'a, L: Launcher> SweepRunner<'a, L> {
    pub fn new(config: &'a Config, launcher: L) -> Self {
        SweepRunner { config, launcher }
    }

    /// Run the build command, if any.
    /// A failed build only aborts when `build.required` is set.
    pub fn build(&mut self) -> Result<Option<InvocationResult>> {
        profiling::scope!("sweep::build");
        let Some(invocation) =
            Invocation::from_command_line(&self.config.build.command)
        else {
            log::info!("No build command, skipping build");
            return Ok(None);
        };

        log::info!("Building: {invocation}");
        let result = match self.launcher.launch(&invocation) {
            Ok(result) => result,
            Err(e) if !self.config.build.required => {
                log::warn!("Build could not be started: {e}");
                return Ok(Some(InvocationResult::not_started(&e)));
            }
            Err(e) => return Err(e),
        };
        log_captured("build", &result.stdout, &result.stderr);

        if result.success {
            let secs = result.elapsed.as_secs_f64();
            log::info!("Build finished in {secs:.3}s");
        } else if self.config.build.required {
            return Err(Error::BuildFailed {
                command: invocation.to_string(),
                status: result.status_label(),
            });
        } else {
            log::warn!(
                "Build `{invocation}` failed ({}), using existing binary",
                result.status_label()
            );
        }
        Ok(Some(result))
    }

    pub fn invocation(&self, combination: &Combination) -> Invocation {
        let layout = &self.config.layout;
        Invocation::new(&self.config.binary)
            .arg(layout.input_path(combination.image))
            .arg(layout.output_path(combination))
            .arg(combination.mode.flag().to_string())
            .arg(combination.block_size.to_string())
            .arg(combination.grid_shape.width.to_string())
            .arg(combination.grid_shape.height.to_string())
    }

    /// Run the binary once for `combination` and time it.
    /// A binary that cannot be launched yields a failed record,
    /// the failure policy decides what happens next.
    pub fn execute(&mut self, combination: &Combination) -> RunRecord {
        let invocation = self.invocation(combination);
        log::debug!("Running: {invocation}");
        let result = self
            .launcher
            .launch(&invocation)
            .unwrap_or_else(|e| InvocationResult::not_started(&e));
        log_captured(&combination.to_string(), &result.stdout, &result.stderr);
        RunRecord::new(combination, result)
    }

    /// Execute every combination in order.
    pub fn run_sweep(&mut self) -> Result<Vec<RunRecord>> {
        profiling::scope!("sweep::run");
        let config = self.config;
        let params = &config.sweep;
        let total = params.len();
        let mut records = Vec::with_capacity(total);
        for (i, combination) in params.combinations().enumerate() {
            let record = self.execute(&combination);
            if record.success {
                log::info!(
                    "[{}/{}] {combination}: {:.4}s",
                    i + 1,
                    total,
                    record.execution_time
                );
            } else {
                let status = status_label(record.exit_code);
                match config.on_failure {
                    FailurePolicy::Continue => {
                        log::warn!(
                            "[{}/{}] {combination}: failed ({status})",
                            i + 1,
                            total
                        );
                    }
                    FailurePolicy::Abort => {
                        return Err(Error::RunFailed {
                            run: combination.to_string(),
                            status,
                        });
                    }
                }
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Build, then sweep.
    pub fn run(&mut self, skip_build: bool) -> Result<SweepOutcome> {
        let build = if skip_build {
            log::info!("Skipping build");
            None
        } else {
            self.build()?
        };
        let records = self.run_sweep()?;
        Ok(SweepOutcome { build, records })
    }
}

fn log_captured(what: &str, stdout: &str, stderr: &str) {
    if !stdout.trim().is_empty() {
        log::debug!("{what} stdout:\n{}", stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        log::debug!("{what} stderr:\n{}", stderr.trim_end());
    }
}
