//! Becoming CLI — drives the session coordinator from the command line.
//!
//! Each invocation is one "page load": the coordinator initializes, restores
//! the persisted session from the state file, runs one operation and exits.
//! Mock mode needs no node; real mode binds the configured contract.

use anyhow::{anyhow, bail, Context, Result};
use becoming_chain::{ContractHandle, NodeClient};
use becoming_ledger::{ChainLedger, LedgerBackend, MockLedger};
use becoming_session::{LedgerMode, SessionConfig, SessionCoordinator};
use becoming_store::FileStore;
use becoming_types::AccountAddress;
use becoming_wallet::MockWalletProvider;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "becoming", about = "Soulbound personal-growth tracker session demo")]
struct Cli {
    /// Path of the session state file.
    #[arg(long, default_value = "./becoming_state.json", env = "BECOMING_STATE_FILE")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show session readiness and the selected account.
    Status,
    /// Connect the wallet and list discovered accounts.
    Connect,
    /// Select an account by address.
    Select { address: String },
    /// Mint the soulbound token for the selected account.
    Mint,
    /// Record a milestone; the proof digest is computed from the proof text.
    Milestone {
        title: String,
        /// Proof text to digest; defaults to the title.
        #[arg(long)]
        proof: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List the milestone log.
    Milestones {
        /// Account to query; defaults to the selected one.
        #[arg(long)]
        account: Option<String>,
    },
    /// Show the avatar stage.
    Stage {
        #[arg(long)]
        account: Option<String>,
    },
    /// Send a tip.
    Tip { recipient: String, amount: u128 },
    /// Wipe mock state and deselect the account.
    Reset {
        /// Leave the mint-each-time override enabled after the reset.
        #[arg(long)]
        auto_mint: bool,
    },
    /// Toggle the development-account re-mint override.
    MintEachTime {
        #[arg(value_parser = clap::value_parser!(bool))]
        enable: bool,
    },
    /// Print the SHA-256 proof digest of the given text.
    Digest { text: String },
}

fn build_ledger(
    config: &SessionConfig,
    store: Arc<FileStore>,
) -> Result<Arc<dyn LedgerBackend>> {
    match config.mode {
        LedgerMode::Mock => Ok(Arc::new(
            MockLedger::new(store).with_delays(config.delays),
        )),
        LedgerMode::Real => {
            let address = config
                .contract_address
                .as_deref()
                .ok_or_else(|| anyhow!("BECOMING_CONTRACT_ADDRESS is required in real mode"))?;
            let client = NodeClient::new(config.node_url.clone())
                .context("failed to build node client")?;
            let contract = ContractHandle::new(client, address);
            Ok(Arc::new(ChainLedger::new(contract, store)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    becoming_utils::init_tracing();
    let cli = Cli::parse();

    let config = SessionConfig::from_env();
    let store = Arc::new(FileStore::open(&cli.state_file)?);
    let ledger = build_ledger(&config, store.clone())?;
    let session = SessionCoordinator::new(
        config,
        store,
        Arc::new(MockWalletProvider::new()),
        ledger,
    )
    .on_celebration(|| println!("🎉 your Becoming NFT is live!"));

    session.initialize().await;

    match cli.command {
        Command::Status => {
            let state = session.state();
            println!("mode:            {:?}", state.mode);
            println!("contract ready:  {}", state.contract_ready);
            match session.selected() {
                Some(account) => {
                    println!("account:         {}", account.address);
                    println!("minted:          {}", session.check_minted().await);
                }
                None => println!("account:         (none)"),
            }
            if let Some(err) = state.last_error {
                println!("last error:      {err}");
            }
        }
        Command::Connect => {
            if !session.connect_wallet(false).await {
                bail!(error_of(&session));
            }
            for account in session.accounts() {
                let name = account.display_name.as_deref().unwrap_or("(unnamed)");
                println!("{}  {}", account.address, name);
            }
        }
        Command::Select { address } => {
            if !session.connect_wallet(false).await {
                bail!(error_of(&session));
            }
            let account = session
                .accounts()
                .into_iter()
                .find(|a| a.address.as_str() == address)
                .ok_or_else(|| anyhow!("no account {address} in the wallet"))?;
            if !session.select_account(&account).await {
                bail!(error_of(&session));
            }
            println!("selected {address}");
        }
        Command::Mint => {
            if !session.mint_nft().await {
                bail!(error_of(&session));
            }
            if let Some(start) = session.journey_start_date().await {
                println!("journey started at {start}");
            }
        }
        Command::Milestone {
            title,
            proof,
            description,
            category,
        } => {
            let digest = session.calculate_digest(proof.as_deref().unwrap_or(&title));
            if !session
                .add_milestone(&title, &digest, description, category)
                .await
            {
                bail!(error_of(&session));
            }
            println!("recorded \"{title}\" ({digest})");
        }
        Command::Milestones { account } => {
            let log = match account {
                Some(address) => {
                    session
                        .get_milestones_for_account(&AccountAddress::new(address))
                        .await
                }
                None => session.get_milestones().await,
            };
            if log.is_empty() {
                println!("no milestones yet");
            }
            for (i, m) in log.iter().enumerate() {
                println!("{:3}. [{}] {}", i + 1, m.recorded_at, m.title);
            }
        }
        Command::Stage { account } => {
            let stage = match account {
                Some(address) => {
                    session
                        .get_avatar_stage_for_account(&AccountAddress::new(address))
                        .await
                }
                None => session.get_avatar_stage().await,
            };
            println!("{stage}");
        }
        Command::Tip { recipient, amount } => {
            if !session.send_tip(&recipient, amount).await {
                bail!(error_of(&session));
            }
            println!("tipped {amount} to {recipient}");
        }
        Command::Reset { auto_mint } => {
            if !session.reset_mock_state(auto_mint) {
                bail!(error_of(&session));
            }
            println!("mock state cleared");
        }
        Command::MintEachTime { enable } => {
            if !session.enable_mint_each_time(enable) {
                bail!(error_of(&session));
            }
            println!("mint-each-time override: {enable}");
        }
        Command::Digest { text } => {
            println!("{}", session.calculate_digest(&text));
        }
    }
    Ok(())
}

fn error_of(session: &SessionCoordinator) -> String {
    session
        .last_error()
        .unwrap_or_else(|| "operation failed".to_string())
}
