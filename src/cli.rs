use crate::build_info;
use crate::config::*;
use crate::error::*;
use crate::params::MemoryMode;
use clap::Parser;
use std::path::PathBuf;

/// Benchmark the CUDA convolution binary over block sizes, grid shapes
/// and memory modes, then tabulate and plot the timings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// TOML file overriding the default configuration.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Convolution binary to benchmark.
    #[arg(short, long)]
    pub binary: Option<PathBuf>,

    /// Only sweep these memory modes.
    #[arg(short, long, value_delimiter = ',')]
    pub modes: Vec<MemoryMode>,

    /// Only sweep these block sizes.
    #[arg(long, value_delimiter = ',')]
    pub block_sizes: Vec<u32>,

    /// Do not run the build command before sweeping.
    #[arg(long)]
    pub skip_build: bool,

    /// Stop at the first failed run.
    #[arg(long)]
    pub fail_fast: bool,

    /// Re-render charts from the existing results table, no runs.
    #[arg(long, conflicts_with_all(["skip_build", "fail_fast"]))]
    pub replot: bool,

    /// Print the effective configuration as TOML and quit
    #[arg(long)]
    pub print_config: bool,

    /// Print build information and quit
    #[arg(long)]
    pub build_info: bool,
}

impl Args {
    pub fn cli_setup(name: &str) -> Self {
        let args = Args::parse();

        if args.build_info {
            build_info::print_report(name);
            std::process::exit(0);
        }

        args
    }

    /// Defaults, then the config file, then command line flags.
    pub fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                log::info!("Loading config from {path:?}");
                Config::from_path(path)?
            }
            None => Config::new(),
        };
        if let Some(binary) = &self.binary {
            config.binary = binary.clone();
        }
        if !self.modes.is_empty() {
            config.sweep.modes = self.modes.clone();
        }
        if !self.block_sizes.is_empty() {
            config.sweep.block_sizes = self.block_sizes.clone();
        }
        if self.fail_fast {
            config.on_failure = FailurePolicy::Abort;
        }
        Ok(config)
    }
}
