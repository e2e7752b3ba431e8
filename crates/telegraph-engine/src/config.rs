//! Harness configuration.
//!
//! Simulation step, run length, RNG seed, logging and the player's knife
//! parameters. Loaded from TOML; a missing or broken file falls back to
//! defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use telegraph_common::{TelegraphError, TelegraphResult};
use tracing::{info, warn};
use tracing_subscriber::filter::{Directive, EnvFilter};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "telegraph.toml";

/// Filter directive applied before any configuration is read.
pub const DEFAULT_LOG_FILTER: &str = "telegraph=info";

/// Builds the tracing filter: `RUST_LOG`, then the default directive, then
/// comma-separated `extra` directives.
pub fn env_filter(extra: Option<&str>) -> TelegraphResult<EnvFilter> {
    let parse = |directive: &str| {
        directive
            .parse::<Directive>()
            .map_err(|e| TelegraphError::Config(format!("Invalid log filter '{directive}': {e}")))
    };

    let mut filter = EnvFilter::from_default_env().add_directive(parse(DEFAULT_LOG_FILTER)?);
    for directive in extra
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        filter = filter.add_directive(parse(directive)?);
    }
    Ok(filter)
}

/// Harness configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    // === Simulation ===
    /// Fixed simulation step (ms)
    pub tick_ms: f32,
    /// Length of the run (ms)
    pub duration_ms: f32,
    /// Seed for move selection
    pub seed: u64,

    // === Logging ===
    /// Extra tracing filter directives, e.g. `telegraph_gameplay=debug`
    pub log_filter: Option<String>,

    // === Content ===
    /// Encounter content file (None = built-in encounter)
    pub content_path: Option<PathBuf>,

    // === Player ===
    /// Player hurtbox radius
    pub player_radius: f32,
    /// Player starting health
    pub player_max_health: f32,
    /// Knife swing range
    pub range: f32,
    /// Knife swing half-angle in degrees
    pub half_angle_deg: f32,
    /// Knife swing base damage
    pub damage: f32,
    /// Time between swings (ms)
    pub swing_every_ms: f32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            // Simulation
            tick_ms: 16.0,
            duration_ms: 30_000.0,
            seed: 1,

            // Logging
            log_filter: None,

            // Content
            content_path: None,

            // Player
            player_radius: 12.0,
            player_max_health: 100.0,
            range: 64.0,
            half_angle_deg: 45.0,
            damage: 10.0,
            swing_every_ms: 400.0,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from `telegraph.toml` in the working directory.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                info!("Loaded config from {}", path.display());
                config.validate();
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Write the default configuration to `path`.
    pub fn write_default<P: AsRef<Path>>(path: P) -> TelegraphResult<()> {
        let path = path.as_ref();
        Self::default().save_to(path).map_err(|e| {
            TelegraphError::Config(format!("Failed to write {}: {e}", path.display()))
        })
    }

    /// Tracing filter with this config's `log_filter` applied.
    pub fn env_filter(&self) -> TelegraphResult<EnvFilter> {
        env_filter(self.log_filter.as_deref())
    }

    /// Clamp values into sensible ranges.
    pub fn validate(&mut self) {
        self.tick_ms = self.tick_ms.clamp(1.0, 100.0);
        self.duration_ms = self.duration_ms.clamp(0.0, 3_600_000.0);

        self.player_radius = self.player_radius.clamp(1.0, 100.0);
        self.player_max_health = self.player_max_health.clamp(1.0, 10_000.0);
        self.range = self.range.clamp(1.0, 1000.0);
        self.half_angle_deg = self.half_angle_deg.clamp(1.0, 180.0);
        self.damage = self.damage.clamp(0.0, 10_000.0);
        self.swing_every_ms = self.swing_every_ms.clamp(self.tick_ms, 60_000.0);
    }

    /// Number of fixed steps in one run.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        (self.duration_ms / self.tick_ms).floor() as u64
    }
}
