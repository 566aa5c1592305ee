use convbench::cli::Args;
use convbench::error::Result;
use convbench::harness;
use convbench::invoke::ProcessLauncher;
use std::process::ExitCode;

fn run(args: &Args) -> Result<u8> {
    let config = args.config()?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(harness::EXIT_OK);
    }

    if args.replot {
        harness::replot(&config)?;
        return Ok(harness::EXIT_OK);
    }

    let session =
        harness::run_session(&config, ProcessLauncher, args.skip_build);
    match &session {
        Ok(session) => {
            log::info!("Table: {:?}", session.table);
            log::info!(
                "Charts: {} written to {:?}",
                session.charts.len(),
                config.layout.graphs_dir
            );
            if session.outcome.failed() > 0 {
                log::warn!("{} runs failed", session.outcome.failed());
            } else {
                println!(
                    "Performance tests completed. \
                     Results saved in graphs and tables directories."
                );
            }
        }
        Err(e) => log::error!("{e}"),
    }
    Ok(harness::exit_status(&session))
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();
    let args = Args::cli_setup("convbench");

    match run(&args) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(harness::EXIT_FATAL)
        }
    }
}
