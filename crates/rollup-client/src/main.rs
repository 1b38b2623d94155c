//! rollup-cli: query rollup state and submit signed transactions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use num_bigint::BigInt;
use rollup_client::{
    AccountIndex, AssetId, CancelOfferTxReq, ClientConfig, L2Client, NftIndex, OfferType,
    SignOfferReq, TransactOpts, TransferTxReq, WithdrawTxReq,
};
use tracing::info;

/// Rollup transaction client
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ROLLUP_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the endpoint from the config file
    #[arg(long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show an account by name, or the signing key's account
    Account { name: Option<String> },
    /// List registered assets
    Assets,
    /// List trading pairs
    Pairs,
    /// Next nonce for an account index
    Nonce { account_index: i64 },
    /// Transfer an asset to an account name or public key
    Transfer {
        to: String,
        asset_id: i64,
        amount: BigInt,
        #[arg(long)]
        memo: Option<String>,
    },
    /// Withdraw an asset to an L1 address
    Withdraw {
        to_address: String,
        asset_id: i64,
        amount: BigInt,
    },
    /// Cancel one of the account's offers
    CancelOffer { offer_id: i64 },
    /// Sign an NFT offer and print its signed form
    SignOffer {
        #[arg(value_enum)]
        side: Side,
        nft_index: i64,
        asset_id: i64,
        amount: BigInt,
        #[arg(long, default_value_t = 0)]
        treasury_rate: i64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Side {
    Buy,
    Sell,
}

impl From<Side> for OfferType {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => OfferType::Buy,
            Side::Sell => OfferType::Sell,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    rollup_client::init_logging()?;

    // CLI arg > ROLLUP_CONFIG env var > default
    let mut config = match args.config {
        Some(path) => ClientConfig::from_file(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => ClientConfig::load()?,
    };
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    info!(endpoint = %config.endpoint, "Configuration loaded");

    let client = L2Client::new(config)?;

    match args.command {
        Command::Account { name } => {
            let account = match name {
                Some(name) => client.get_account_by_name(&name).await?,
                None => client.get_my_account().await?,
            };
            print_json(&account)?;
        }
        Command::Assets => print_json(&client.get_asset_list().await?)?,
        Command::Pairs => print_json(&client.get_available_pairs().await?)?,
        Command::Nonce { account_index } => {
            let nonce = client
                .get_next_nonce(AccountIndex::new(account_index))
                .await?;
            println!("{nonce}");
        }
        Command::Transfer {
            to,
            asset_id,
            amount,
            memo,
        } => {
            let mut opts = TransactOpts::new();
            if let Some(memo) = memo {
                opts = opts.with_call_data(memo);
            }
            let req = TransferTxReq {
                to,
                asset_id: AssetId::new(asset_id),
                asset_amount: amount,
            };
            println!("{}", client.transfer(req, opts).await?);
        }
        Command::Withdraw {
            to_address,
            asset_id,
            amount,
        } => {
            let req = WithdrawTxReq {
                asset_id: AssetId::new(asset_id),
                asset_amount: amount,
                to_address,
            };
            println!("{}", client.withdraw(req, TransactOpts::new()).await?);
        }
        Command::CancelOffer { offer_id } => {
            let tx_id = client
                .cancel_offer(CancelOfferTxReq { offer_id }, TransactOpts::new())
                .await?;
            println!("{tx_id}");
        }
        Command::SignOffer {
            side,
            nft_index,
            asset_id,
            amount,
            treasury_rate,
        } => {
            let signed = client
                .sign_offer(SignOfferReq {
                    offer_type: side.into(),
                    nft_index: NftIndex::new(nft_index),
                    asset_id: AssetId::new(asset_id),
                    asset_amount: amount,
                    treasury_rate,
                    offer_id: None,
                    expired_at: None,
                })
                .await?;
            println!("{signed}");
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
