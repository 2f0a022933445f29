use anyhow::Context;
use clap::Parser;
use farmbots_core::{GridPos, SimConfig, World};

/// Headless driver for the farmbots simulation: builds a world from CLI
/// arguments, steps it with a fixed dt, and prints the run summary as JSON.
#[derive(Parser, Debug)]
#[command(name = "farmbots", about = "Run the farm simulation headless")]
struct Args {
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 2000)]
    steps: usize,

    /// Fixed per-tick delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Sample field stats every N ticks.
    #[arg(long, default_value_t = 60)]
    sample_every: usize,

    #[arg(long, default_value_t = 20)]
    cols: i32,

    #[arg(long, default_value_t = 12)]
    rows: i32,

    /// Seeder rest station as "x,y".
    #[arg(long, value_parser = parse_pos, default_value = "1,1")]
    seeder_rest: GridPos,

    /// Storage station as "x,y".
    #[arg(long, value_parser = parse_pos, default_value = "18,10")]
    storage: GridPos,

    #[arg(long, default_value_t = 5)]
    seeders: usize,

    #[arg(long, default_value_t = 3)]
    harvesters: usize,

    /// Allow 8-directional target search.
    #[arg(long)]
    diagonals: bool,

    /// RNG seed; negative for non-reproducible randomness.
    #[arg(long, default_value_t = 42)]
    seed: i64,

    /// Sprinkle this many random plants before the run starts.
    #[arg(long, default_value_t = 0)]
    sprinkle: usize,

    /// Also print a full world snapshot after the run.
    #[arg(long)]
    snapshot: bool,
}

fn parse_pos(raw: &str) -> Result<GridPos, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {raw:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(GridPos::new(x, y))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = SimConfig {
        cols: args.cols,
        rows: args.rows,
        seeder_rest: args.seeder_rest,
        storage: args.storage,
        seeder_count: args.seeders,
        harvester_count: args.harvesters,
        allow_diagonals: args.diagonals,
        seed: args.seed,
        ..SimConfig::default()
    };

    let mut world = World::try_new(config).context("invalid simulation config")?;
    if args.sprinkle > 0 {
        let placed = world.sprinkle_plants(args.sprinkle);
        eprintln!("sprinkled {placed}/{} plants", args.sprinkle);
    }

    let summary = world
        .try_run(args.steps, args.dt, args.sample_every)
        .context("run failed")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&world.snapshot())?);
    }
    Ok(())
}
