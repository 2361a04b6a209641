//! voxpay application binary - composition root.
//!
//! 1. Load `.env`, CLI arguments and the TOML configuration
//! 2. Build the JSON-RPC wallet provider
//! 3. Wire parser, confirmation gate, session manager, orchestrator and
//!    receipt watcher into a command pipeline
//! 4. Feed it one `--utterance`, or every line read from stdin
//!
//! Ctrl-C while a command is in flight cancels it: confirmation, wallet
//! connection and the receipt watch all stop, and nothing is submitted if
//! submission has not started yet. A second Ctrl-C exits at once. Ctrl-C
//! between commands exits.

mod cli;
mod console;

use std::sync::Arc;

use clap::Parser;

use voxpay_action::{
    CancelToken, CommandPipeline, ConfirmationGate, Confirmer, IntentParser, PipelineReport,
    ReceiptWatcher, SessionManager, StaticConfirmer, StatusSink, TransactionOrchestrator,
    UnitConverter, WalletProvider,
};
use voxpay_core::config::VoxpayConfig;
use voxpay_rpc::EthersWalletProvider;

use cli::CliArgs;
use console::{ConsoleConfirmer, ConsoleInput, ConsoleStatusSink};

/// Exit status for a process stopped by SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Handle one utterance with Ctrl-C wired to the command's cancel token.
async fn run_command(pipeline: &CommandPipeline, utterance: &str) -> PipelineReport {
    let cancel = CancelToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            tracing::info!("Interrupt received, cancelling in-flight command");
            cancel.cancel();

            // A wallet call that never answers can still hold the command.
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Second interrupt received, exiting");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })
    };

    let report = pipeline.handle(utterance, cancel).await;
    interrupt.abort();
    tracing::debug!(report = ?report, "Command finished");
    report
}

/// Read utterances from stdin until EOF or Ctrl-C.
async fn utterance_loop(pipeline: &CommandPipeline, input: &ConsoleInput) {
    tracing::info!("Reading utterances from stdin, one per line");
    loop {
        let line = tokio::select! {
            line = input.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, exiting");
                break;
            }
        };
        let Some(line) = line else {
            tracing::info!("End of input");
            break;
        };

        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }
        run_command(pipeline, utterance).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env is the normal case.
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }

    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = VoxpayConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting voxpay v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    config.network.rpc_url = args.resolve_rpc_url(&config.network.rpc_url);
    config.validate()?;

    // Wallet provider. A bad endpoint is reported per command, not at startup.
    let provider: Option<Arc<dyn WalletProvider>> =
        match EthersWalletProvider::new(&config.network.rpc_url) {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                tracing::error!(error = %e, "Wallet provider unavailable");
                None
            }
        };

    // Pipeline.
    let input = Arc::new(ConsoleInput::new());
    let confirmer: Arc<dyn Confirmer> = if args.yes {
        tracing::warn!("Auto-confirming every command (--yes)");
        Arc::new(StaticConfirmer(true))
    } else {
        Arc::new(ConsoleConfirmer::new(Arc::clone(&input)))
    };
    let status: Arc<dyn StatusSink> = Arc::new(ConsoleStatusSink);

    let pipeline = CommandPipeline::new(
        IntentParser::new(),
        ConfirmationGate::new(confirmer, config.confirmation.clone()),
        SessionManager::new(provider, config.network.clone()),
        TransactionOrchestrator::new(
            UnitConverter::new(config.network.decimals, config.network.currency_symbol.clone()),
            ReceiptWatcher::new(config.watcher.clone()),
        ),
        status,
    );
    tracing::info!(
        network = %config.network.name,
        network_id = config.network.network_id,
        "Command pipeline ready"
    );

    match args.utterance {
        Some(ref utterance) => {
            if let PipelineReport::Failed(e) = run_command(&pipeline, utterance).await {
                return Err(e.into());
            }
        }
        None => utterance_loop(&pipeline, &input).await,
    }

    Ok(())
}
