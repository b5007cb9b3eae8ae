//! neonplay terminal table
//!
//! Plays rounds against the wagering engine and prints what a UI would show.

use clap::{Parser, Subcommand, ValueEnum};
use neonplay::config::generate_sample_config;
use neonplay::games::blackjack::BlackjackPhase;
use neonplay::{
    BetConfig, BetRecord, ConfigLoader, EngineConfig, EngineEvent, EngineResult, PendingBet,
    RouletteColor, WagerEngine,
};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "neonplay")]
#[command(about = "Simulated wagering table: slots, roulette, blackjack, dice", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Stake per round (defaults to ledger.default_stake)
    #[arg(long, global = true)]
    stake: Option<u64>,

    /// Seed for reproducible draws
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Skip animation delays
    #[arg(long, global = true)]
    fast: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spin the three-reel slot machine
    Slots,
    /// Bet on a roulette color
    Roulette {
        #[arg(long, value_enum, default_value = "red")]
        color: ColorArg,
    },
    /// Bet on the sum of two dice
    Dice {
        #[arg(long, default_value = "7")]
        target: u8,
    },
    /// Play one blackjack hand, hitting below the threshold
    Blackjack {
        #[arg(long, default_value = "17")]
        stand_on: u32,
    },
    /// Cycle through all four games
    Session {
        #[arg(long, default_value = "4")]
        rounds: usize,
    },
    /// Write a sample configuration file
    SampleConfig {
        #[arg(long, default_value = "neonplay.toml")]
        out: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ColorArg {
    Red,
    Black,
    Green,
}

impl From<ColorArg> for RouletteColor {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Red => RouletteColor::Red,
            ColorArg::Black => RouletteColor::Black,
            ColorArg::Green => RouletteColor::Green,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if let Command::SampleConfig { out } = &args.command {
        generate_sample_config(out)?;
        println!("📝 Wrote sample configuration to {}", out);
        return Ok(());
    }

    let config = load_config(&args)?;
    let stake = args.stake.unwrap_or(config.ledger.default_stake);
    let engine = WagerEngine::new(&config);

    println!("🎰 neonplay table open");
    println!("   Balance: {:.2} {}", engine.balance(), engine.token_symbol());
    let quote = engine.quote(stake);
    println!(
        "   Stake {} → fee (0.5%) {:.2}, net bet {:.2}",
        quote.stake, quote.fee, quote.net_stake
    );

    match args.command {
        Command::Slots => play(&engine, stake, BetConfig::Slots).await?,
        Command::Roulette { color } => {
            play(&engine, stake, BetConfig::Roulette { color: color.into() }).await?
        }
        Command::Dice { target } => play(&engine, stake, BetConfig::Dice { target_sum: target }).await?,
        Command::Blackjack { stand_on } => play_blackjack(&engine, stake, stand_on).await?,
        Command::Session { rounds } => {
            for round in 0..rounds {
                let result = match round % 4 {
                    0 => play(&engine, stake, BetConfig::Slots).await,
                    1 => play(&engine, stake, BetConfig::Roulette { color: RouletteColor::Black }).await,
                    2 => play(&engine, stake, BetConfig::Dice { target_sum: 7 }).await,
                    _ => play_blackjack(&engine, stake, 17).await,
                };
                if let Err(e) = result {
                    println!("⛔ {}", e);
                    break;
                }
            }
        }
        Command::SampleConfig { .. } => {}
    }

    print_summary(&engine);
    Ok(())
}

fn load_config(args: &Args) -> EngineResult<EngineConfig> {
    let loader = match &args.config {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;

    if let Some(seed) = args.seed {
        config.rng.seed = Some(seed);
    }
    if args.fast {
        config.timing = EngineConfig::instant().timing;
    }
    Ok(config)
}

async fn play(engine: &WagerEngine, stake: u64, bet: BetConfig) -> EngineResult<()> {
    let events = engine.subscribe();
    let pending = engine.place_bet(stake, bet)?;
    let record = watch(events, pending).await?;
    print_record(&record);
    Ok(())
}

async fn play_blackjack(engine: &WagerEngine, stake: u64, stand_on: u32) -> EngineResult<()> {
    let pending = engine.deal(stake)?;
    let mut view = engine.blackjack_view();
    println!("🃏 Player {:?} ({}), dealer {:?}", view.player, view.player_total, view.dealer);

    while view.phase == BlackjackPhase::Playing && view.player_total < stand_on {
        view = engine.hit()?;
        println!("🃏 Hit → {:?} ({})", view.player, view.player_total);
    }
    if view.phase == BlackjackPhase::Playing {
        view = engine.stand()?;
        println!("🃏 Dealer draws to {:?} ({})", view.dealer, view.dealer_total);
    }

    let record = pending.await?;
    print_record(&record);
    engine.reset_blackjack()?;
    Ok(())
}

/// Render frames until the round settles
async fn watch(mut events: broadcast::Receiver<EngineEvent>, mut pending: PendingBet) -> EngineResult<BetRecord> {
    loop {
        tokio::select! {
            record = &mut pending => return record,
            Ok(event) = events.recv() => match event {
                EngineEvent::SlotsFrame { symbols } => {
                    println!("   {} {} {}", symbols[0], symbols[1], symbols[2]);
                }
                EngineEvent::DiceFrame { dice } => println!("   ⚀ {} {}", dice[0], dice[1]),
                _ => {}
            },
        }
    }
}

fn print_record(record: &BetRecord) {
    let mark = if record.payout > 0.0 { "🏆" } else { "💸" };
    println!(
        "{} {} stake {} → {:?}, payout {:.2}",
        mark, record.game, record.stake, record.result, record.payout
    );
    if let Ok(detail) = serde_json::to_string(&record.outcome) {
        println!("   {}", detail);
    }
}

fn print_summary(engine: &WagerEngine) {
    println!();
    println!("📊 Balance: {:.2} {}", engine.balance(), engine.token_symbol());
    println!("   Fees paid: {:.4} {} → {}", engine.total_fees_paid(), engine.token_symbol(), engine.fee_address());
    println!("   Recent bets:");
    for record in engine.history() {
        println!(
            "   {} {:<9} {:>6} {:?} {:.2}",
            record.timestamp.format("%H:%M:%S"),
            record.game.to_string(),
            record.stake,
            record.result,
            record.payout
        );
    }
}
