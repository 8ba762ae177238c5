//! sector-inspect: generate sectors and exercise the save/enter cycle.
//!
//! Usage:
//!   sector-inspect generate --seed 0x1a2b [--rules rules.json] [--hybrid 2,7]
//!   sector-inspect cycle --seed 42 --saves ./saves --destroy 3 --ticks 120

use std::path::PathBuf;
use std::process;

use glam::DVec3;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use voidline_core::entities::Npc;
use voidline_core::ids::DurableId;
use voidline_core::rules::GenerationRules;
use voidline_core::types::Position;
use voidline_procgen::{HybridParams, WorldGenerator};
use voidline_sector::{
    CoordinatorConfig, JsonDirDiffStorage, PersistError, SectorCoordinator, SectorDefinition,
};

const TICK: f64 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "generate" => cmd_generate(&args[2..]),
        "cycle" => cmd_cycle(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "sector-inspect: Voidline sector generation and persistence tool\n\
         \n\
         Commands:\n\
         \n\
         generate  Print the generated sector for a seed as JSON\n\
         \n\
           --seed <N>          Root seed, decimal or 0x-prefixed hex\n\
           --rules <path>      Generation rules JSON (optional, default: built-in)\n\
           --hybrid <n,offset> Generate exactly n planets with a seed offset (optional)\n\
         \n\
         cycle     Enter a sector, destroy asteroids, run it, leave and re-enter\n\
         \n\
           --seed <N>          Root seed\n\
           --saves <dir>       Directory for sector diffs\n\
           --destroy <K>       Asteroids to destroy (default: 1)\n\
           --ticks <T>         60 Hz ticks to simulate (default: 60)\n\
           --rules <path>      Generation rules JSON (optional)\n\
         \n\
         Set RUST_LOG=debug for load diagnostics and diff traffic.\n"
    );
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_seed(args: &[String]) -> u32 {
    let Some(raw) = arg_value(args, "--seed") else {
        eprintln!("Error: --seed <N> is required");
        process::exit(1);
    };
    let parsed = match raw.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse::<u32>(),
    };
    parsed.unwrap_or_else(|e| {
        eprintln!("Error: invalid seed '{raw}': {e}");
        process::exit(1);
    })
}

fn parse_count(args: &[String], flag: &str, default: usize) -> usize {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_hybrid(args: &[String]) -> Option<HybridParams> {
    let raw = arg_value(args, "--hybrid")?;
    match hybrid_from_str(raw) {
        Some(params) => Some(params),
        None => {
            eprintln!("Error: invalid --hybrid '{raw}', expected <n,offset>");
            process::exit(1);
        }
    }
}

fn hybrid_from_str(raw: &str) -> Option<HybridParams> {
    let (extra, offset) = raw.split_once(',')?;
    Some(HybridParams {
        extra_planets: extra.trim().parse().ok()?,
        seed_offset: offset.trim().parse().ok()?,
    })
}

fn load_rules(args: &[String]) -> GenerationRules {
    let Some(path) = arg_value(args, "--rules") else {
        return GenerationRules::default();
    };
    GenerationRules::from_json_file(&PathBuf::from(path)).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    })
}

// --- Generate command ---

fn cmd_generate(args: &[String]) {
    let seed = parse_seed(args);
    let generator = WorldGenerator::new(load_rules(args)).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let sector = generator.generate(seed, parse_hybrid(args));
    match serde_json::to_string_pretty(&sector) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: failed to encode sector: {e}");
            process::exit(1);
        }
    }
}

// --- Cycle command ---

fn cmd_cycle(args: &[String]) {
    let seed = parse_seed(args);
    let Some(saves) = arg_value(args, "--saves") else {
        eprintln!("Error: --saves <dir> is required");
        process::exit(1);
    };
    let destroy = parse_count(args, "--destroy", 1);
    let ticks = parse_count(args, "--ticks", 60);

    let config = CoordinatorConfig {
        rules: load_rules(args),
        ..CoordinatorConfig::default()
    };
    if let Err(e) = run_cycle(config, PathBuf::from(saves), seed, destroy, ticks) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_cycle(
    config: CoordinatorConfig,
    saves: PathBuf,
    seed: u32,
    destroy: usize,
    ticks: usize,
) -> Result<(), PersistError> {
    tracing::debug!(seed, destroy, ticks, saves = %saves.display(), "starting save cycle");
    let mut coordinator = SectorCoordinator::new(config, JsonDirDiffStorage::new(saves))?;
    let def = SectorDefinition::procedural(format!("seed-{seed:08x}"), seed);

    let sector = coordinator.enter(&def)?;
    println!(
        "Entered {}: {} planets, {} stations, {} asteroids",
        sector.id(),
        sector.planets().len(),
        sector.stations().len(),
        sector.asteroids().len()
    );

    let targets: Vec<DurableId> = sector
        .asteroids()
        .iter()
        .take(destroy)
        .map(|a| a.id.clone())
        .collect();
    for id in &targets {
        sector.destroy_asteroid(id);
    }

    let probe_id = DurableId::new(format!("npc-probe-{seed:08x}"));
    if sector.find(&probe_id).is_none() {
        sector.spawn_npc(Npc {
            id: probe_id.clone(),
            name: "Survey Probe".to_string(),
            faction: "Independent".to_string(),
            position: Position::ORIGIN,
            velocity: DVec3::new(12.0, 0.0, -4.0),
        });
    }

    for _ in 0..ticks {
        sector.update(TICK);
    }

    coordinator.leave()?;
    let sector = coordinator.enter(&def)?;
    println!(
        "Re-entered {}: {} asteroids live, {} destroyed",
        sector.id(),
        sector.asteroids().len(),
        sector.field().map_or(0, |f| f.destroyed_count())
    );
    for id in &targets {
        let status = if sector.asteroids().iter().any(|a| &a.id == id) {
            "LIVE (regression!)"
        } else {
            "gone"
        };
        println!("  {id}: {status}");
    }
    if let Some(probe) = sector.find(&probe_id) {
        let p = probe.position();
        println!("  {probe_id} at ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
    }
    for diagnostic in sector.diagnostics() {
        println!("  diagnostic: {diagnostic:?}");
    }

    coordinator.leave()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hybrid_from_str_accepts_count_and_offset() {
        let params = hybrid_from_str("2, 7").unwrap();
        assert_eq!(params.extra_planets, 2);
        assert_eq!(params.seed_offset, 7);
    }

    #[test]
    fn test_hybrid_from_str_rejects_malformed_values() {
        for raw in ["2", "x,7", "2,", "-1,7", ""] {
            assert!(hybrid_from_str(raw).is_none(), "accepted {raw:?}");
        }
    }
}
