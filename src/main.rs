use chatstream::cli::{parse_args, version_line, CliCommand, TerminalCallbacks, USAGE};
use chatstream::client::ChatClient;
use chatstream::config::ChatConfig;
use chatstream::models::ChatRequest;
use chatstream::session::{CancelHandle, SessionState};

use color_eyre::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // Logs go to stderr; stdout carries only the answer
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let (message, api_base, timeout_secs) = match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Chat {
            message,
            api_base,
            timeout_secs,
        } => (message, api_base, timeout_secs),
    };

    init_tracing();

    let mut config = ChatConfig::from_env()?;
    if let Some(api_base) = api_base {
        config = config.with_api_base(api_base);
    }
    if let Some(timeout_secs) = timeout_secs {
        config = config.with_timeout_secs(timeout_secs);
    }
    debug!("Using chat endpoint {}", config.chat_url());

    let client = ChatClient::from_config(config)?;

    let cancel = CancelHandle::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, cancelling stream");
            on_ctrl_c.cancel();
        }
    });

    let mut callbacks = TerminalCallbacks::stdio();
    let state = client
        .send_with_cancel(&ChatRequest::new(&message), &mut callbacks, cancel)
        .await;

    if state == SessionState::Errored {
        std::process::exit(1);
    }
    Ok(())
}
