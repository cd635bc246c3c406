mod cli;

use clap::Parser;
use cli::{BANNER, Cli};
use std::process::ExitCode;
use std::sync::Arc;
use svn_ripper::config::Config;
use svn_ripper::observability::{self, RunStats};
use svn_ripper::processor::TargetProcessor;
use svn_ripper::report::load_template;
use svn_ripper::targets;
use svn_ripper::transport::HttpClient;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const EXIT_USAGE: u8 = 1;
const EXIT_NO_TARGETS_REACHABLE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.no_banner {
        eprintln!("{BANNER}");
    }

    let mut config = match Config::load(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            observability::init_tracing("info", cli.verbose);
            error!(error = %e, "Invalid configuration");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    cli.apply_to(&mut config);
    observability::init_tracing(&config.logging.level, cli.verbose);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid options");
        return ExitCode::from(EXIT_USAGE);
    }

    let raw_targets = match targets::collect(cli.url.as_deref(), cli.list.as_deref()) {
        Ok(targets) => targets,
        Err(e) => {
            error!(error = %e, "Specify -u for a single URL or -l for a file of URLs");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let template = match load_template(config.recovery.template.as_deref()) {
        Ok(template) => template,
        Err(e) => {
            error!(error = %e, "Cannot load report template");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let client = match HttpClient::new(
        config.transport.http_config(),
        config.transport.proxy.as_deref(),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Cannot build HTTP client");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    info!(
        targets = raw_targets.len(),
        output = %config.recovery.output_dir.display(),
        workers = config.recovery.workers,
        "Starting recovery"
    );

    let processor = TargetProcessor::new(Arc::new(client), template, config.recovery.clone())
        .with_cancellation(cancel);
    let stats = RunStats::new();
    let outcome = processor.run(&raw_targets, &stats).await;
    stats.snapshot().log();

    if outcome.reachable == 0 {
        warn!(attempted = outcome.attempted, "No target exposed a readable manifest");
        return ExitCode::from(EXIT_NO_TARGETS_REACHABLE);
    }

    ExitCode::SUCCESS
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupt received, finishing in-flight downloads");
        cancel.cancel();
    }
}
