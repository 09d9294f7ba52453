use bitcoin::Txid;
use clap::{Args, Parser, Subcommand};

use wasabi_rpc::types::{CoinRef, Payment, TransactionRequest};
use wasabi_rpc::{Config, DEFAULT_PORT};

/// Command-line client for a Wasabi Wallet daemon over JSON-RPC.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Daemon host (no scheme, no port).
    #[arg(long, default_value = "127.0.0.1", env = "WASABI_RPC_HOST")]
    pub host: String,

    /// Daemon JSON-RPC port.
    #[arg(long, default_value_t = DEFAULT_PORT, env = "WASABI_RPC_PORT")]
    pub port: u16,

    /// RPC username (must be paired with --rpc-pass).
    #[arg(long, env = "WASABI_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password (must be paired with --rpc-user).
    #[arg(long, env = "WASABI_RPC_PASS", hide_env_values = true)]
    pub rpc_pass: Option<String>,

    /// Extra HTTP header sent with every request (repeatable).
    #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Wallet addressed by wallet-scoped commands.
    #[arg(long, env = "WASABI_WALLET", global = true)]
    pub wallet: Option<String>,

    /// Skip the TCP reachability check before issuing the call.
    #[arg(long)]
    pub skip_probe: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            host: self.host.clone(),
            port: self.port,
            custom_headers: self.headers.iter().cloned().collect(),
            rpc_user: self.rpc_user.clone(),
            rpc_password: self.rpc_pass.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Check whether the daemon accepts connections.
    Up,
    /// Daemon status and synchronization progress.
    Status,
    /// Create a wallet and print its recovery words.
    CreateWallet {
        name: String,
        #[command(flatten)]
        password: PasswordArg,
    },
    LoadWallet {
        name: String,
    },
    /// Recover a wallet from its recovery words.
    RecoverWallet {
        name: String,
        /// Space-separated recovery words (quote them).
        mnemonic: String,
        #[command(flatten)]
        password: PasswordArg,
    },
    ListWallets,
    /// All coins of the wallet, spent and unspent.
    ListCoins,
    ListUnspentCoins,
    WalletInfo,
    NewAddress {
        label: String,
    },
    /// Build and broadcast a transaction.
    Send(TransactionArgs),
    /// Build a transaction without broadcasting it.
    Build(TransactionArgs),
    /// Build without fee checks, allowing unconfirmed coins.
    BuildUnsafe(TransactionArgs),
    Broadcast {
        /// Raw transaction hex.
        hex: String,
    },
    History,
    ListKeys,
    StartCoinjoin {
        #[command(flatten)]
        password: PasswordArg,
        #[arg(long)]
        stop_when_all_mixed: bool,
        #[arg(long)]
        override_pleb_stop: bool,
    },
    /// Coinjoin every coin of the wallet into another wallet.
    StartCoinjoinSweep {
        output_wallet: String,
        #[command(flatten)]
        password: PasswordArg,
    },
    StopCoinjoin,
    /// Stop the daemon.
    Stop,
    FeeRates,
    /// Exclude a coin from coinjoins (or include it again with --include).
    ExcludeFromCoinjoin {
        txid: Txid,
        index: u32,
        #[arg(long)]
        include: bool,
    },
    /// Queue a payment to be made from a coinjoin.
    PayInCoinjoin {
        address: String,
        /// Amount in satoshis.
        amount: u64,
        #[command(flatten)]
        password: PasswordArg,
    },
    ListPaymentsInCoinjoin,
    CancelPaymentInCoinjoin {
        payment_id: String,
    },
    /// Build a transaction cancelling an unconfirmed one (not broadcast).
    CancelTransaction {
        txid: Txid,
        #[command(flatten)]
        password: PasswordArg,
    },
    /// Build a fee-bumped replacement (not broadcast).
    SpeedUpTransaction {
        txid: Txid,
        #[command(flatten)]
        password: PasswordArg,
    },
}

#[derive(Args)]
pub struct PasswordArg {
    /// Wallet password; empty for wallets without one.
    #[arg(
        long,
        env = "WASABI_WALLET_PASSWORD",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,
}

#[derive(Args)]
pub struct TransactionArgs {
    /// Destination as ADDRESS:SATS[:LABEL] (repeatable).
    #[arg(long = "payment", required = true, value_parser = parse_payment)]
    pub payments: Vec<Payment>,

    /// Coin to spend as TXID:INDEX (repeatable).
    #[arg(long = "coin", required = true, value_parser = parse_coin)]
    pub coins: Vec<CoinRef>,

    /// Confirmation target in blocks.
    #[arg(long, default_value = "2")]
    pub fee_target: u32,

    #[command(flatten)]
    pub password: PasswordArg,
}

impl TransactionArgs {
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest {
            payments: self.payments.clone(),
            coins: self.coins.clone(),
            fee_target: self.fee_target,
            password: self.password.password.clone(),
        }
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("header name must not be empty".to_owned());
    }
    Ok((name.to_owned(), value.trim().to_owned()))
}

fn parse_payment(raw: &str) -> Result<Payment, String> {
    let mut parts = raw.splitn(3, ':');
    let address = parts.next().unwrap_or_default();
    if address.is_empty() {
        return Err(format!("expected ADDRESS:SATS[:LABEL], got `{raw}`"));
    }
    let amount = parts
        .next()
        .ok_or_else(|| format!("missing amount in `{raw}`"))?
        .parse::<u64>()
        .map_err(|e| format!("invalid amount in `{raw}`: {e}"))?;
    let label = parts.next().unwrap_or_default();

    Ok(Payment {
        send_to: address.to_owned(),
        amount,
        label: label.to_owned(),
    })
}

fn parse_coin(raw: &str) -> Result<CoinRef, String> {
    let (txid, index) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected TXID:INDEX, got `{raw}`"))?;
    let txid = txid
        .parse::<Txid>()
        .map_err(|e| format!("invalid txid in `{raw}`: {e}"))?;
    let index = index
        .parse::<u32>()
        .map_err(|e| format!("invalid index in `{raw}`: {e}"))?;
    Ok(CoinRef { txid, index })
}
