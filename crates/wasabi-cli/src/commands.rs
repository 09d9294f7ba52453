use eyre::{eyre, WrapErr};
use serde::Serialize;
use serde_json::Value;

use wasabi_rpc::{RpcErrorCode, WalletError, WasabiError, WasabiRpc};

use crate::cli::Command;

/// Execute `command` against the daemon and return its JSON output.
/// Commands without a payload yield `Value::Null`.
pub async fn run(
    command: &Command,
    wallet: Option<&str>,
    rpc: &dyn WasabiRpc,
) -> eyre::Result<Value> {
    let wallet = || wallet.ok_or_else(|| eyre!("this command needs --wallet (or WASABI_WALLET)"));

    match command {
        Command::Up => Ok(serde_json::json!({ "up": rpc.is_wallet_up().await })),
        Command::Status => to_json(rpc.get_status().await),
        Command::CreateWallet { name, password } => {
            to_json(rpc.create_wallet(name, &password.password).await)
        }
        Command::LoadWallet { name } => to_json(rpc.load_wallet(name).await),
        Command::RecoverWallet {
            name,
            mnemonic,
            password,
        } => to_json(rpc.recover_wallet(name, mnemonic, &password.password).await),
        Command::ListWallets => to_json(rpc.list_wallets().await),
        Command::ListCoins => to_json(rpc.list_coins(wallet()?).await),
        Command::ListUnspentCoins => to_json(rpc.list_unspent_coins(wallet()?).await),
        Command::WalletInfo => to_json(rpc.get_wallet_info(wallet()?).await),
        Command::NewAddress { label } => to_json(rpc.get_new_address(wallet()?, label).await),
        Command::Send(args) => to_json(rpc.send(wallet()?, &args.to_request()).await),
        Command::Build(args) => to_json(rpc.build(wallet()?, &args.to_request()).await),
        Command::BuildUnsafe(args) => {
            to_json(rpc.build_unsafe_transaction(wallet()?, &args.to_request()).await)
        }
        Command::Broadcast { hex } => to_json(rpc.broadcast(wallet()?, hex).await),
        Command::History => to_json(rpc.get_history(wallet()?).await),
        Command::ListKeys => to_json(rpc.list_keys(wallet()?).await),
        Command::StartCoinjoin {
            password,
            stop_when_all_mixed,
            override_pleb_stop,
        } => to_json(
            rpc.start_coinjoin(
                wallet()?,
                &password.password,
                *stop_when_all_mixed,
                *override_pleb_stop,
            )
            .await,
        ),
        Command::StartCoinjoinSweep {
            output_wallet,
            password,
        } => to_json(
            rpc.start_coinjoin_sweep(wallet()?, &password.password, output_wallet)
                .await,
        ),
        Command::StopCoinjoin => to_json(rpc.stop_coinjoin(wallet()?).await),
        Command::Stop => to_json(rpc.stop().await),
        Command::FeeRates => to_json(rpc.get_fee_rates().await),
        Command::ExcludeFromCoinjoin {
            txid,
            index,
            include,
        } => to_json(
            rpc.exclude_from_coinjoin(wallet()?, txid, *index, !*include)
                .await,
        ),
        Command::PayInCoinjoin {
            address,
            amount,
            password,
        } => to_json(
            rpc.pay_in_coinjoin(wallet()?, address, *amount, &password.password)
                .await,
        ),
        Command::ListPaymentsInCoinjoin => to_json(rpc.list_payments_in_coinjoin(wallet()?).await),
        Command::CancelPaymentInCoinjoin { payment_id } => {
            to_json(rpc.cancel_payment_in_coinjoin(wallet()?, payment_id).await)
        }
        Command::CancelTransaction { txid, password } => {
            to_json(rpc.cancel_transaction(wallet()?, txid, &password.password).await)
        }
        Command::SpeedUpTransaction { txid, password } => {
            to_json(rpc.speed_up_transaction(wallet()?, txid, &password.password).await)
        }
    }
}

fn to_json<T: Serialize>(result: Result<T, WasabiError>) -> eyre::Result<Value> {
    match result {
        Ok(value) => serde_json::to_value(value).wrap_err("encode command output"),
        Err(err) => {
            let mut report = eyre::Report::new(err);
            if let Some(hint) = report.downcast_ref::<WasabiError>().and_then(error_hint) {
                report = report.wrap_err(hint);
            }
            Err(report)
        }
    }
}

/// An actionable hint for failures users commonly hit.
pub fn error_hint(err: &WasabiError) -> Option<&'static str> {
    match err {
        WasabiError::HttpStatus(401 | 403) => {
            Some("hint: authentication failed; verify --rpc-user/--rpc-pass match the daemon's JsonRpcUser/JsonRpcPassword")
        }
        WasabiError::HttpStatus(404) => {
            Some("hint: endpoint not found; verify the wallet name passed with --wallet")
        }
        WasabiError::Transport(_) => {
            Some("hint: request could not be sent; verify the daemon is running with JsonRpcServerEnabled")
        }
        WasabiError::Rpc(rpc) => match (rpc.code, rpc.wallet_error()) {
            (_, Some(WalletError::WalletNotFullyLoaded)) => {
                Some("hint: load the wallet first with `wasabi-cli load-wallet <NAME>` and wait for it to sync")
            }
            (_, Some(WalletError::IncorrectPassword)) => {
                Some("hint: pass the wallet password with --password or WASABI_WALLET_PASSWORD")
            }
            (RpcErrorCode::MethodNotFound, _) => {
                Some("hint: the daemon does not know this method; it may be an older Wasabi version")
            }
            _ => None,
        },
        _ => None,
    }
}
