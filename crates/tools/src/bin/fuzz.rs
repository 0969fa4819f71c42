use anyhow::{Context, Result};
use clap::Parser;
use crawl_core::{Command, DungeonConfig, Occupant, Orientation, Session, TurnFlow};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();

    let args = Args::parse();
    println!("Starting fuzz harness on seed {} for max {} turns...", args.seed, args.turns);

    let mut session = Session::new(DungeonConfig::default(), args.seed)
        .with_context(|| format!("Session setup failed for seed {}", args.seed))?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut commands: Vec<Command> = Orientation::ALL.iter().map(|&o| Command::Move(o)).collect();
    commands.push(Command::Rotate(Orientation::East)); // Occasional turn of the active dungeon

    let mut played = 0;
    while played < args.turns {
        let command = choose(&mut rng, &commands);
        match session.advance(command).context("turn failed")? {
            TurnFlow::Ended(outcome) => {
                println!("Finished with outcome {:?} after {} turns", outcome, played);
                break;
            }
            TurnFlow::Repeat => continue,
            TurnFlow::Continue => played += 1,
        }

        // Assert invariants
        let player = session.player();
        assert!(player.vitals.health <= player.vitals.health_max, "Invariant failed: HP > Max HP");
        let active = session.active().context("active dungeon missing")?;
        let position = active.player_position().context("player missing")?;
        assert!(
            active.tile(position).occupants().contains(&Occupant::Player),
            "Invariant failed: player marker missing"
        );
        for (key, entity) in active.entities() {
            assert!(
                active.tile(entity.position).occupants().contains(&Occupant::Entity(key)),
                "Invariant failed: {} missing from its tile",
                entity.name
            );
        }
    }

    info!(dungeons = session.dungeons().len(), hash = session.snapshot_hash(), "fuzz run done");
    println!("Fuzzing completed successfully.");
    Ok(())
}
