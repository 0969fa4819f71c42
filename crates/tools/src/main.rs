use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crawl_core::{
    Catalog, DungeonConfig, EntityFactory, Orientation, SeededRandom, generate_dungeon,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the generator's random source
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Generation settings: `.toml`, `.json`, or the 15-field line format
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Clockwise quarter turns applied after generation
    #[arg(short, long, default_value_t = 0)]
    rotate: i32,
    /// Print only what a player standing at the center would see
    #[arg(long)]
    vision: bool,
}

fn load_config(path: &Path) -> Result<DungeonConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = match path.extension().and_then(|extension| extension.to_str()) {
        Some("toml") => DungeonConfig::from_toml_str(&text),
        Some("json") => DungeonConfig::from_json_str(&text),
        _ => {
            let fields: Vec<&str> = text
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|field| !field.is_empty())
                .collect();
            DungeonConfig::from_fields(&fields)
        }
    };
    Ok(config)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => DungeonConfig::default(),
    };

    let catalog = Catalog::standard();
    let factory = EntityFactory::new(&catalog);
    let mut random = SeededRandom::new(args.seed);
    let mut dungeon = generate_dungeon(&config, &factory, &catalog, &mut random)
        .with_context(|| format!("Generation failed for seed {}", args.seed))?;

    let turn = Orientation::from_quarter_turns(args.rotate);
    dungeon.rotate(turn);
    info!(seed = args.seed, size = ?dungeon.size(), ?turn, "dungeon ready");

    let rows = if args.vision {
        dungeon.place_player(dungeon.size().center(), &Catalog::default_player());
        dungeon.visible_rows()
    } else {
        dungeon.icon_rows()
    };
    for row in rows {
        println!("{row}");
    }
    println!("Links: {}", dungeon.links.len());
    println!("Fingerprint: {:016x}", dungeon.fingerprint());

    Ok(())
}
