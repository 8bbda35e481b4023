//! Operator CLI
//!
//! Stands in for the chat-command layer: each subcommand maps to one engine
//! operation, renders its receipt, and exits. Admin capability is implicit:
//! whoever can run the CLI against the database is the administrator.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use coinbot::economy::{EcoStore, EconomyEngine, UserId};

#[derive(Parser)]
#[command(name = "coinbot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the coinbot economy engine", long_about = None)]
pub struct Cli {
    /// Path to the economy database (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print receipts as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a user's balance (accounts start at 100 on first use)
    Balance { user: String },

    /// Claim the daily bonus for a user
    Daily { user: String },

    /// Steal a random amount from another user
    Steal { actor: String, target: String },

    /// Transfer funds to another user
    Exchange {
        actor: String,
        target: String,
        amount: i64,
    },

    /// Top balances
    Leaderboard {
        /// How many entries to show
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },

    /// Give funds to a user out of the admin's own balance
    Grant {
        admin: String,
        target: String,
        amount: i64,
    },

    /// Take funds away from a user (fails if they hold less)
    Remove { target: String, amount: i64 },

    /// Reset a user's balance to zero
    Reset { target: String },

    /// Inspect or tune the game parameters
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show every parameter with its current value
    List,

    /// Show one parameter
    Get { key: String },

    /// Set a parameter; durations accept forms like "30m", "1h30m", "2j"
    Set { key: String, value: String },
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = open_store(cli.db).await?;
    let engine = EconomyEngine::new(store);
    let json = cli.json;

    match cli.command {
        Commands::Balance { user } => {
            let user = UserId::new(user);
            let balance = engine.balance_of(&user).await?;
            if json {
                println!("{}", serde_json::json!({ "user": user, "balance": balance }));
            } else {
                println!("💰 {user}: {balance}");
            }
        }

        Commands::Daily { user } => {
            let receipt = engine.daily(&UserId::new(user)).await?;
            emit(
                json,
                &receipt,
                format!("🎁 Daily bonus: +{} — new balance {}", receipt.amount, receipt.balance),
            )?;
        }

        Commands::Steal { actor, target } => {
            let receipt = engine
                .steal(&UserId::new(actor), &UserId::new(target))
                .await?;
            emit(
                json,
                &receipt,
                format!(
                    "🦹 Stole {} — you now hold {}, the target {}",
                    receipt.amount, receipt.actor_balance, receipt.target_balance
                ),
            )?;
        }

        Commands::Exchange {
            actor,
            target,
            amount,
        } => {
            let receipt = engine
                .exchange(&UserId::new(actor), &UserId::new(target), amount)
                .await?;
            emit(
                json,
                &receipt,
                format!(
                    "🔄 Transferred {} — sender {}, recipient {}",
                    receipt.amount, receipt.actor_balance, receipt.target_balance
                ),
            )?;
        }

        Commands::Leaderboard { limit } => {
            let entries = engine.leaderboard(limit).await?;
            if json {
                println!("{}", serde_json::to_string(&entries)?);
            } else {
                println!("🏆 Leaderboard");
                for (rank, entry) in entries.iter().enumerate() {
                    println!("{:>2}. {} — {}", rank + 1, entry.user, entry.balance);
                }
            }
        }

        Commands::Grant {
            admin,
            target,
            amount,
        } => {
            let receipt = engine
                .grant(&UserId::new(admin), &UserId::new(target), amount)
                .await?;
            emit(
                json,
                &receipt,
                format!(
                    "🎁 Granted {} — admin balance {}, target balance {}",
                    receipt.amount, receipt.admin_balance, receipt.target_balance
                ),
            )?;
        }

        Commands::Remove { target, amount } => {
            let receipt = engine.remove(&UserId::new(target), amount).await?;
            emit(
                json,
                &receipt,
                format!("💸 Removed {} — new balance {}", receipt.amount, receipt.balance),
            )?;
        }

        Commands::Reset { target } => {
            let receipt = engine.reset(&UserId::new(target)).await?;
            emit(
                json,
                &receipt,
                format!("🔄 Balance reset (was {})", receipt.previous_balance),
            )?;
        }

        Commands::Config { action } => match action {
            ConfigAction::List => {
                let entries = engine.config_snapshot().await?;
                if json {
                    println!("{}", serde_json::to_string(&entries)?);
                } else {
                    for entry in entries {
                        println!("{:<22} {}", entry.key, entry.display);
                    }
                }
            }
            ConfigAction::Get { key } => {
                let entry = engine.get_config(&key).await?;
                emit(json, &entry, format!("{} = {}", entry.key, entry.display))?;
            }
            ConfigAction::Set { key, value } => {
                let entry = engine.set_config(&key, &value).await?;
                emit(json, &entry, format!("✅ {} → {}", entry.key, entry.display))?;
            }
        },
    }

    Ok(())
}

fn emit<T: Serialize>(json: bool, receipt: &T, text: String) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string(receipt)?);
    } else {
        println!("{text}");
    }
    Ok(())
}

async fn open_store(db: Option<PathBuf>) -> Result<EcoStore, Box<dyn Error>> {
    let path = match db {
        Some(path) => path,
        None => {
            let dir = dirs::data_dir()
                .ok_or("no platform data directory found; pass --db")?
                .join("coinbot");
            std::fs::create_dir_all(&dir)?;
            dir.join("economy.db")
        }
    };
    Ok(EcoStore::open(&path).await?)
}
