use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use nbody_sim_core::SimConfig;

use crate::viewer::{ChamberSettings, ViewerSettings};

/// A 2D gravitational n-body simulation where close bodies devour each other
#[derive(Parser, Debug)]
#[command()]
pub struct Args {
    /// Number of orbiting bodies seeded around the centre
    #[arg(short, long, default_value_t = 200)]
    pub particles: usize,

    /// Mass of the fixed, invisible body at the canvas centre
    #[arg(short, long, default_value_t = 1e6)]
    pub center_mass: f64,

    /// Fixed simulation step per frame, in seconds
    #[arg(long, default_value_t = 0.005)]
    pub dt: f64,

    /// YAML file with simulation configuration; missing keys use defaults
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    /// Seed for the scenario; overrides the seed in the config file
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Enclose the canvas in a reflecting box
    #[arg(long)]
    pub chamber: bool,

    /// Velocity kept after a wall bounce (with --chamber)
    #[arg(long, default_value_t = 1.0)]
    pub restitution: f64,

    /// Add a uniform downward field of this strength
    #[arg(long)]
    pub field: Option<f64>,
}

impl Args {
    /// Reads the configuration file (if any) and folds in the CLI flags.
    pub fn into_settings(self) -> Result<ViewerSettings> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => SimConfig::default(),
        };
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }

        Ok(ViewerSettings {
            cfg,
            particles: self.particles,
            center_mass: self.center_mass,
            dt: self.dt,
            chamber: self.chamber.then_some(ChamberSettings {
                restitution: self.restitution,
            }),
            field: self.field,
        })
    }
}

fn load_config(path: &Path) -> Result<SimConfig> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let cfg: SimConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}
