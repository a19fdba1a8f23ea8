//! Binary entrypoint for the grindbot CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml`
//! - `status` - print store statistics (players, encounters)
//! - `player <id>` - show one player's ledger and inventory
//! - `grant <id> <coins>` - operator balance grant
//! - `grant-item <id> <item>` - operator item grant
//! - `sweep` - resolve overdue interactive sessions to their defaults
//!
//! The chat dispatcher embeds the library crate directly; this binary is
//! for operating the store out-of-band. See the library docs: `grindbot::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use grindbot::config::Config;
use grindbot::game::{Activity, GameEngine, GameStoreBuilder};

#[derive(Parser)]
#[command(name = "grindbot")]
#[command(about = "Game-resolution engine for a chat-platform economy bot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new grindbot configuration
    Init,
    /// Show store status and statistics
    Status,
    /// Show one player's ledger and inventory
    Player {
        /// Player id as supplied by the chat platform
        id: String,
        /// Emit machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Grant coins to a player (operator only)
    Grant {
        id: String,
        coins: u64,
    },
    /// Grant a catalog item to a player (operator only)
    GrantItem {
        id: String,
        item: String,
    },
    /// Resolve overdue interactive sessions to their defaults
    Sweep,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes
    // the default file later).
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            println!("Wrote starter configuration to {}", cli.config);
            Ok(())
        }
        Commands::Status => {
            let engine = open_engine(&pre_config, &cli.config).await?;
            let players = engine.store().list_player_ids()?;
            println!("players: {}", players.len());
            let mut with_balance = 0usize;
            for id in &players {
                let record = engine.store().get_player(id)?;
                if record.balance > 0 {
                    with_balance += 1;
                }
            }
            println!("players with a balance: {}", with_balance);
            for activity in [Activity::Explore, Activity::Work, Activity::BossFight] {
                let cooling = players
                    .iter()
                    .filter(|id| {
                        engine
                            .check_cooldown(id, activity)
                            .map(|s| !s.is_allowed())
                            .unwrap_or(false)
                    })
                    .count();
                println!("cooling down on {}: {}", activity.name(), cooling);
            }
            Ok(())
        }
        Commands::Player { id, json } => {
            let engine = open_engine(&pre_config, &cli.config).await?;
            let player = engine.store().get_player(&id)?;
            let inventory = engine.store().list_inventory(&id)?;
            if json {
                let payload = serde_json::json!({
                    "player": player,
                    "inventory": inventory,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{}: {} coins, {} xp, rank {:?}",
                    player.id, player.balance, player.experience, player.rank
                );
                if inventory.is_empty() {
                    println!("inventory: empty");
                } else {
                    for item in inventory {
                        let sealed = if item.sealed { " (sealed)" } else { "" };
                        println!(
                            "  {} [{}] durability {}%{}",
                            item.name,
                            item.rarity.tag(),
                            item.durability,
                            sealed
                        );
                    }
                }
            }
            Ok(())
        }
        Commands::Grant { id, coins } => {
            let engine = open_engine(&pre_config, &cli.config).await?;
            let balance = engine.grant(&id, coins)?;
            info!("operator grant: {} +{} coins", id, coins);
            println!("{} now has {} coins", id, balance);
            Ok(())
        }
        Commands::GrantItem { id, item } => {
            let engine = open_engine(&pre_config, &cli.config).await?;
            let granted = engine.grant_item(&id, &item)?;
            println!("{} received {} [{}]", id, granted.name, granted.rarity.tag());
            Ok(())
        }
        Commands::Sweep => {
            let engine = open_engine(&pre_config, &cli.config).await?;
            let expired = engine.sweep_sessions();
            println!("expired {} session(s) to their defaults", expired);
            Ok(())
        }
    }
}

async fn open_engine(pre_config: &Option<Config>, config_path: &str) -> Result<GameEngine> {
    let config = match pre_config {
        Some(config) => config.clone(),
        None => Config::load(config_path).await?,
    };
    let store = GameStoreBuilder::new(config.storage.game_db_path()).open()?;
    Ok(GameEngine::new(store)
        .with_schedule(config.cooldowns.schedule())
        .with_timeouts(config.sessions.timeouts()))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if verbosity == 0 {
        if let Some(cfg) = config {
            if let Ok(level) = cfg.logging.level.parse::<log::LevelFilter>() {
                builder.filter_level(level);
            }
        }
    }

    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    if let Some(file) = log_file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            let write_mutex = mutex.clone();

            // If stdout is a terminal, mirror log lines to the console;
            // under a service manager stdout is redirected and skipped.
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
    }
    let _ = builder.try_init();
}
