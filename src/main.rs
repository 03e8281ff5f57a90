use clap::Parser;
use log::LevelFilter;

use dns_sweep::initialization::init_logger_with;
use dns_sweep::{run_probe, Config};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    // Silent mode keeps stdout clean for piping; only errors reach stderr
    let level = if config.silent {
        LevelFilter::Error
    } else {
        config.log_level.clone().into()
    };
    if let Err(e) = init_logger_with(level, config.log_format.clone()) {
        eprintln!("Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    match run_probe(config).await {
        Ok(report) => {
            log::info!(
                "Done: {} attempted, {} resolved, {} dropped in {:.2}s",
                report.attempted,
                report.resolved,
                report.dropped,
                report.elapsed_seconds
            );
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
