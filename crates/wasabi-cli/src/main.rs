mod cli;
mod commands;

use clap::Parser;
use eyre::{eyre, WrapErr};

use wasabi_rpc::{WasabiClient, WasabiRpc};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so stdout stays machine-readable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = args.config();
    let client = WasabiClient::new(&config).wrap_err("while building the wallet RPC client")?;
    let endpoint = client.endpoint();

    // Probe the daemon first so an unreachable host fails with a clear
    // message instead of a raw connection error.
    let needs_probe = !matches!(args.command, cli::Command::Up) && !args.skip_probe;
    if needs_probe && !client.is_wallet_up().await {
        return Err(eyre!(
            "could not connect to the wallet daemon at {}:{}\n\
             hint: start Wasabi with JsonRpcServerEnabled=true and check --host/--port",
            endpoint.host(),
            endpoint.port()
        ));
    }
    tracing::debug!(host = endpoint.host(), port = endpoint.port(), "wallet daemon reachable");

    let output = commands::run(&args.command, args.wallet.as_deref(), &client).await?;
    if output.is_null() {
        println!("ok");
    } else {
        let rendered = serde_json::to_string_pretty(&output).wrap_err("render command output")?;
        println!("{rendered}");
    }

    Ok(())
}
