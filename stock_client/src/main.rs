//! Stock Client, a terminal host for the stock tracker widget. It loads the
//! widget attributes, resolves a default API key from `FINNHUB_API_KEY` or a
//! key file when none is configured, fetches quotes from Finnhub and redraws
//! the grid on every change. Settings are changed with console commands.
//!
//! Usage example (CLI):
//! ```bash
//! stock_client --symbols AAPL,MSFT --auto-refresh true --interval 10
//! stock_client --config ./attributes.json --once
//! ```
//!
//! Type `h` while running for the list of console commands.
#![warn(missing_docs)]
mod args;
mod console;
mod error;
mod render;

use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use stock_common::Locale;
use stock_tracker::{
    CredentialChain, EnvCredential, FinnhubClient, FinnhubConfig, KeyFileCredential,
    RefreshController, WidgetView,
};
use tokio::sync::{mpsc, watch};

use crate::args::Args;
use crate::console::ConsoleCommand;
use crate::error::ClientError;

type Controller = RefreshController<FinnhubClient>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    init_logger();
    let args = Args::parse();

    let config = args.widget_config()?;
    info!("Widget attributes: {:?}", config);

    let mut finnhub = FinnhubConfig {
        timeout: Duration::from_secs(args.timeout_secs),
        ..Default::default()
    };
    if let Some(base_url) = &args.base_url {
        finnhub.base_url = base_url.clone();
    }
    let api = FinnhubClient::new(finnhub)?;

    let credentials = CredentialChain::new()
        .with(EnvCredential::default())
        .with(KeyFileCredential(args.key_file.clone()));

    let controller = RefreshController::builder(api)
        .config(config)
        .credential_source(credentials)
        .locale(args.locale)
        .build();

    if args.once {
        return run_once(&controller, args.locale).await;
    }
    run_interactive(&controller, args.locale).await
}

/// Single fetch cycle; a failed fetch becomes the process error.
async fn run_once(controller: &Controller, locale: Locale) -> Result<(), ClientError> {
    controller.on_config_ready();
    controller.refresh().await;
    draw(controller.view(), controller, locale);

    match controller.snapshot().state.last_error {
        Some(message) => Err(ClientError::Format(message)),
        None => Ok(()),
    }
}

/// Mounts the widget and serves console commands until `q`, Ctrl+C, or a
/// closed update channel.
async fn run_interactive(controller: &Controller, locale: Locale) -> Result<(), ClientError> {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = shutdown_tx.send(true);
    })
    .map_err(|e| ClientError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let (line_tx, mut line_rx) = mpsc::channel::<String>(16);
    console::spawn_stdin_reader(line_tx);
    let mut stdin_open = true;

    let mut updates = controller.subscribe();
    controller.mount();
    draw(controller.view(), controller, locale);
    println!("{}", console::HELP);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = WidgetView::from_snapshot(&updates.borrow_and_update());
                draw(view, controller, locale);
            }
            line = line_rx.recv(), if stdin_open => match line {
                Some(line) => match console::parse_command(&line) {
                    Ok(Some(ConsoleCommand::Retry)) => {
                        controller.retry();
                    }
                    Ok(Some(ConsoleCommand::Settings(update))) => controller.update(update),
                    Ok(Some(ConsoleCommand::Help)) => println!("{}", console::HELP),
                    Ok(Some(ConsoleCommand::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => warn!("{}", e),
                },
                None => {
                    info!("Stdin closed; press Ctrl+C to exit.");
                    stdin_open = false;
                }
            },
            _ = shutdown_rx.changed() => break,
        }
    }

    controller.unmount();
    info!("Client stopped.");
    Ok(())
}

fn draw(view: WidgetView, controller: &Controller, locale: Locale) {
    println!("{}\n", render::render(&view, &controller.config(), locale));
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
