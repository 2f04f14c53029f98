//! Headless skirmish runner
//!
//! Builds a synthetic two-clan skirmish, drives it through the engine
//! worker and prints a summary. Useful for eyeballing behaviour and
//! throughput.

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use skirmish_ai::actions::Action;
use skirmish_ai::bot::{AiState, Bot, BotTier};
use skirmish_ai::core::config::{load_config, EngineConfig};
use skirmish_ai::core::error::Result;
use skirmish_ai::core::types::{ClanId, Rect};
use skirmish_ai::engine::{spawn_engine, InitMessage, TickMessage};
use skirmish_ai::world::{ClanInfo, Obstacle, PlayerView, SafeZone, WorldGeometry};

/// Headless skirmish runner
#[derive(Parser, Debug)]
#[command(name = "skirmish_ai")]
#[command(about = "Run a synthetic bot skirmish through the tactical engine")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Bots per clan
    #[arg(long, default_value_t = 50)]
    bots: usize,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Side length of the square world
    #[arg(long, default_value_t = 4000.0)]
    world_size: f64,

    /// Engine configuration (TOML); defaults when omitted
    #[arg(long)]
    config: Option<String>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct SkirmishSummary {
    seed: u64,
    ticks: u64,
    bots: usize,
    shots: u64,
    mega_shots: u64,
    chasing_at_end: usize,
    shields_active_at_end: usize,
    skipped: u64,
    elapsed_ms: u128,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skirmish_ai=info")),
        )
        .init();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(run_skirmish(&args, config, seed))?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => {
            println!("Skirmish Result");
            println!("===============");
            println!("Seed:            {}", summary.seed);
            println!("Ticks:           {}", summary.ticks);
            println!("Bots:            {}", summary.bots);
            println!("Shots:           {}", summary.shots);
            println!("Mega-shots:      {}", summary.mega_shots);
            println!("Chasing at end:  {}", summary.chasing_at_end);
            println!("Shields at end:  {}", summary.shields_active_at_end);
            println!("Skipped records: {}", summary.skipped);
            println!("Elapsed:         {} ms", summary.elapsed_ms);
        }
    }

    Ok(())
}

async fn run_skirmish(args: &Args, config: EngineConfig, seed: u64) -> Result<SkirmishSummary> {
    let mut rng = StdRng::seed_from_u64(seed);
    let tick_ms = config.tick_ms;
    let geometry = build_geometry(args.world_size, &mut rng);
    let mut bots = spawn_bots(args.bots, args.world_size, &mut rng);

    let (handle, task) = spawn_engine(config, seed)?;
    handle.init(InitMessage::new(geometry)).await?;

    let started = std::time::Instant::now();
    let mut shots = 0;
    let mut mega_shots = 0;
    let mut skipped = 0;

    for tick in 0..args.ticks {
        let live_players = bots.iter().map(player_view).collect();
        let reply = handle
            .tick(TickMessage {
                bots,
                live_players,
                now_ms: tick as f64 * tick_ms,
            })
            .await?;

        for action in &reply.actions {
            match action {
                Action::Shoot { .. } => shots += 1,
                Action::MegaShot { .. } => mega_shots += 1,
            }
        }
        skipped += reply.skipped.len() as u64;
        bots = reply.updated_bots;
    }

    let elapsed_ms = started.elapsed().as_millis();
    handle.shutdown().await?;
    let engine = task.join().await?;
    tracing::info!(stats = ?engine.stats(), "skirmish finished");

    Ok(SkirmishSummary {
        seed,
        ticks: args.ticks,
        bots: bots.len(),
        shots,
        mega_shots,
        chasing_at_end: bots.iter().filter(|b| b.state == AiState::Chase).count(),
        shields_active_at_end: bots
            .iter()
            .filter(|b| b.abilities.as_ref().is_some_and(|a| a.shield_active))
            .count(),
        skipped,
        elapsed_ms,
    })
}

/// Two clans in opposite corners with a scatter of asteroids between them
fn build_geometry(world_size: f64, rng: &mut StdRng) -> WorldGeometry {
    let zone = world_size * 0.1;
    let mut obstacles = vec![
        Obstacle::base(ClanId(0), Rect::new(zone, zone, 120.0, 120.0), 2000.0),
        Obstacle::base(
            ClanId(1),
            Rect::new(world_size - zone - 120.0, world_size - zone - 120.0, 120.0, 120.0),
            2000.0,
        ),
    ];
    for _ in 0..(world_size / 200.0) as usize {
        let size = rng.gen_range(30.0..120.0);
        obstacles.push(Obstacle::asteroid(
            rng.gen_range(zone * 2.0..world_size - zone * 2.0),
            rng.gen_range(zone * 2.0..world_size - zone * 2.0),
            size,
            size,
        ));
    }

    WorldGeometry {
        world_size,
        clans: vec![
            ClanInfo {
                id: ClanId(0),
                base_rect: Some(Rect::new(zone, zone, 120.0, 120.0)),
                color: Some("blue".into()),
            },
            ClanInfo {
                id: ClanId(1),
                base_rect: Some(Rect::new(world_size - zone - 120.0, world_size - zone - 120.0, 120.0, 120.0)),
                color: Some("red".into()),
            },
        ],
        safe_zones: vec![
            SafeZone::new(ClanId(0), Rect::new(0.0, 0.0, zone, zone)),
            SafeZone::new(ClanId(1), Rect::new(world_size - zone, world_size - zone, zone, zone)),
        ],
        central_safe_zone: None,
        obstacles,
    }
}

/// Each clan fields mostly normal bots, a few elites and one boss
fn spawn_bots(per_clan: usize, world_size: f64, rng: &mut StdRng) -> Vec<Bot> {
    let mut bots = Vec::with_capacity(per_clan * 2);
    for clan in 0..2u32 {
        let (low, high) = if clan == 0 {
            (world_size * 0.1, world_size * 0.45)
        } else {
            (world_size * 0.55, world_size * 0.9 - 40.0)
        };
        for i in 0..per_clan {
            let tier = match i {
                0 => BotTier::Boss,
                i if i % 10 == 0 => BotTier::Elite,
                _ => BotTier::Normal,
            };
            let mut bot = Bot::new(
                format!("c{clan}_bot{i}"),
                ClanId(clan),
                tier,
                rng.gen_range(low..high),
                rng.gen_range(low..high),
            );
            bot.patrol_timer = rng.gen_range(0..240);
            bots.push(bot);
        }
    }
    bots
}

fn player_view(bot: &Bot) -> PlayerView {
    PlayerView {
        id: bot.id.clone(),
        x: bot.x,
        y: bot.y,
        health: bot.health,
        max_health: bot.max_health,
        clan: bot.clan,
        is_human: false,
        is_elite: bot.tier == BotTier::Elite,
        is_boss: bot.tier == BotTier::Boss,
    }
}
