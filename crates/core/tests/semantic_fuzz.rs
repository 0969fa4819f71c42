mod common;

use common::check_consistency;
use crawl_core::{Command, DungeonConfig, Orientation, Session, Size, TurnFlow};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn commands() -> Vec<Command> {
    let mut commands: Vec<Command> = Orientation::ALL.iter().map(|&o| Command::Move(o)).collect();
    // Moves dominate so the player actually travels.
    commands.extend_from_slice(&commands.clone());
    commands.push(Command::Rotate(Orientation::East));
    commands.push(Command::Rotate(Orientation::South));
    commands.push(Command::Rotate(Orientation::West));
    commands
}

fn run_fuzz_session(map_seed: u64, command_seed: u64, max_turns: u32) -> Result<(), String> {
    let mut config = DungeonConfig::default();
    config.size.determined = true;
    config.size.dungeon = Size::new(26, 22);
    let mut session = Session::new(config, map_seed).map_err(|error| error.to_string())?;
    let mut rng = ChaCha8Rng::seed_from_u64(command_seed);
    let commands = commands();

    for _ in 0..max_turns {
        let command = choose(&mut rng, &commands);
        let flow = session.advance(command).map_err(|error| error.to_string())?;
        if let TurnFlow::Ended(_) = flow {
            break;
        }

        let Some(active) = session.active() else {
            return Err(format!("Invariant failed: no active dungeon on map_seed {map_seed}"));
        };
        let Some(position) = active.player_position() else {
            return Err(format!("Invariant failed: player missing on map_seed {map_seed}"));
        };
        if !active.visible(position) {
            return Err(format!("Invariant failed: player cell hidden on map_seed {map_seed}"));
        }
        if session.player().vitals.health > session.player().vitals.health_max {
            return Err(format!("Invariant failed: HP > Max HP on map_seed {map_seed}"));
        }
        for (index, dungeon) in session.dungeons().iter().enumerate() {
            check_consistency(dungeon)
                .map_err(|error| format!("dungeon {index} on map_seed {map_seed}: {error}"))?;
            if index != session.active_index() && dungeon.player_position().is_some() {
                return Err(format!("Invariant failed: player placed twice on map_seed {map_seed}"));
            }
            for (link, doorway) in dungeon.links.iter().enumerate() {
                let Some(partner) = doorway.partner else {
                    continue;
                };
                let reciprocal = session.dungeons()[partner.dungeon].links[partner.link];
                let back = reciprocal.partner.ok_or("one-sided link")?;
                if (back.dungeon, back.link) != (index, link) || back.exit != doorway.entrance {
                    return Err(format!("Invariant failed: links disagree on map_seed {map_seed}"));
                }
            }
        }
    }

    Ok(())
}

#[test]
fn test_fuzz_session_simulation() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(12));
    let seeds = (any::<u64>(), any::<u64>());

    runner
        .run(&seeds, |(map_seed, command_seed)| {
            run_fuzz_session(map_seed, command_seed, 300).map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("session fuzz should preserve invariants");
}
