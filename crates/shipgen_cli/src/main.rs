//! shipgen - seeded procedural spaceship generator.
//!
//! # Usage
//!
//! ```bash
//! # One ship from the seed "michael", written to ./out
//! shipgen --seed michael --output out
//!
//! # 16 ships derived from seed 7, generated in parallel
//! shipgen --seed 7 --count 16
//!
//! # Dump the effective configuration for editing
//! shipgen --write-config
//! ```
//!
//! Settings are read from `shipgen.ron` (see `--config`); flags override
//! individual fields.

mod config;
mod export;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use shipgen::{generate_spaceship, Seed, ShipConfig};
use std::path::PathBuf;

/// Seeded procedural spaceship generator
#[derive(Parser)]
#[command(name = "shipgen")]
#[command(about = "Generate spaceship meshes and write them as OBJ + MTL")]
#[command(version)]
struct Cli {
    /// Seed: an integer, or any text (hashed). Falls back to the config
    /// file's seed, then to the clock.
    #[arg(short, long)]
    seed: Option<String>,

    /// RON configuration file
    #[arg(short, long, default_value = "shipgen.ron")]
    config: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Number of ships; seeds after the first are derived from the base seed
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Minimum hull segments per end
    #[arg(long)]
    hull_min: Option<u32>,

    /// Maximum hull segments per end
    #[arg(long)]
    hull_max: Option<u32>,

    /// Chance that each allowed mirror is applied
    #[arg(long)]
    symmetry_probability: Option<f64>,

    /// Also allow mirroring top to bottom
    #[arg(long)]
    vertical_symmetry: bool,

    /// Never mirror
    #[arg(long)]
    no_symmetry: bool,

    /// Skip the bevel
    #[arg(long)]
    no_bevel: bool,

    /// Hull and asymmetry only: no engines, turrets, antennae, lights or greebles
    #[arg(long)]
    no_details: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut ShipConfig) {
        if let Some(seed) = &self.seed {
            config.seed = Some(parse_seed(seed));
        }
        if let Some(n) = self.hull_min {
            config.num_hull_segments_min = n;
        }
        if let Some(n) = self.hull_max {
            config.num_hull_segments_max = n;
        }
        if let Some(p) = self.symmetry_probability {
            config.symmetry_probability = p;
        }
        if self.vertical_symmetry {
            config.allow_vertical_symmetry = true;
        }
        if self.no_symmetry {
            config.allow_horizontal_symmetry = false;
            config.allow_vertical_symmetry = false;
        }
        if self.no_bevel {
            config.apply_bevel = false;
        }
        if self.no_details {
            config.create_engines = false;
            config.create_weapons = false;
            config.create_antenna = false;
            config.create_lights = false;
            config.create_greebles = false;
        }
    }
}

fn parse_seed(s: &str) -> Seed {
    s.parse::<u64>().map(Seed::Number).unwrap_or_else(|_| Seed::Text(s.to_owned()))
}

/// Seed of ship `index` in a batch.
fn batch_seed(base: u64, index: u32) -> u64 {
    base.wrapping_add((index as u64 + 1).wrapping_mul(31337))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = config::load(&cli.config);
    cli.apply(&mut config);

    if cli.write_config {
        config::save(&config, &cli.config)?;
        log::info!("Wrote {}", cli.config.display());
        return Ok(());
    }
    if cli.count == 0 {
        bail!("--count must be at least 1");
    }
    config.validate().context("invalid configuration")?;

    if cli.count == 1 {
        let ship = generate_spaceship(&config).context("generating ship")?;
        let path = export::write(&ship, &cli.output)?;
        log::info!("Seed {} -> {}", ship.seed, path.display());
        return Ok(());
    }

    let base = Seed::resolve(config.seed.as_ref());
    let paths: Result<Vec<_>> = (0..cli.count)
        .into_par_iter()
        .map(|i| {
            let seed = batch_seed(base, i);
            let ship = generate_spaceship(&config.clone().with_seed(seed))
                .with_context(|| format!("generating ship with seed {seed}"))?;
            export::write(&ship, &cli.output)
        })
        .collect();
    let paths = paths?;
    log::info!("Wrote {} ships to {}", paths.len(), cli.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_seeds() {
        assert_eq!(parse_seed("42"), Seed::Number(42));
        assert_eq!(parse_seed("michael"), Seed::Text("michael".into()));
        assert_eq!(parse_seed("-3"), Seed::Text("-3".into()));
    }

    #[test]
    fn batch_seeds_are_distinct() {
        let seeds: Vec<u64> = (0..8).map(|i| batch_seed(u64::MAX - 40_000, i)).collect();
        let mut sorted = seeds.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), seeds.len());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["shipgen", "--seed", "michael", "--hull-max", "9", "--no-bevel", "--no-details"]);
        let mut config = ShipConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.seed, Some(Seed::Text("michael".into())));
        assert_eq!(config.num_hull_segments_max, 9);
        assert!(!config.apply_bevel);
        assert!(!config.create_engines && !config.create_greebles);
        assert!(config.allow_horizontal_symmetry);
    }
}
