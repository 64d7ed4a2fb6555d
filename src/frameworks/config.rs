use crate::domain::{
    BossTuning, ShipTuning, StarPlacement, StarTuning, Vector2, WorldTuning,
};
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

// Runtime/server constants (not gameplay tuning).

pub fn bind_addr() -> String {
    env::var("SPACEWARS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:11000".to_string())
}

pub fn settings_path() -> PathBuf {
    env::var("SPACEWARS_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("settings.toml"))
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay settings file, read once at startup. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Edge length of the square world.
    pub universe_size: u32,
    pub ms_per_frame: u64,
    pub frames_per_shot: u32,
    pub projectile_speed: f64,
    /// Ship respawn delay in ticks.
    pub respawn_rate: u32,
    pub star_respawn_rate: u32,
    pub ship: ShipSettings,
    pub star: StarSettings,
    pub boss: BossSettings,
    pub stars: Vec<StarSettingsEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShipSettings {
    pub accel: f64,
    pub turn: f64,
    pub health: i32,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarSettings {
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BossSettings {
    pub enabled: bool,
    pub health: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StarSettingsEntry {
    pub x: f64,
    pub y: f64,
    pub mass: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            universe_size: 750,
            ms_per_frame: 16,
            frames_per_shot: 6,
            projectile_speed: 15.0,
            respawn_rate: 300,
            star_respawn_rate: 300,
            ship: ShipSettings::default(),
            star: StarSettings::default(),
            boss: BossSettings::default(),
            stars: vec![StarSettingsEntry {
                x: 0.0,
                y: 0.0,
                mass: 0.01,
            }],
        }
    }
}

impl Default for ShipSettings {
    fn default() -> Self {
        Self {
            accel: 0.08,
            turn: 2.0,
            health: 5,
            size: 20.0,
        }
    }
}

impl Default for StarSettings {
    fn default() -> Self {
        Self { size: 35.0 }
    }
}

impl Default for BossSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            health: 100,
        }
    }
}

impl GameSettings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings: GameSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, bool); 7] = [
            ("universe_size", self.universe_size >= 1),
            ("ms_per_frame", self.ms_per_frame >= 1),
            ("frames_per_shot", self.frames_per_shot >= 1),
            ("respawn_rate", self.respawn_rate >= 1),
            ("star_respawn_rate", self.star_respawn_rate >= 1),
            ("ship.health", self.ship.health >= 1),
            ("boss.health", self.boss.health >= 1),
        ];
        match checks.iter().find(|(_, ok)| !ok) {
            Some(&(field, _)) => Err(ConfigError::Invalid {
                field,
                reason: "must be at least 1",
            }),
            None => Ok(()),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.ms_per_frame)
    }

    pub fn world_tuning(&self) -> WorldTuning {
        let defaults = WorldTuning::default();
        WorldTuning {
            world_size: self.universe_size,
            projectile_speed: self.projectile_speed,
            ship: ShipTuning {
                accel_rate: self.ship.accel,
                turn_rate: self.ship.turn,
                max_hp: self.ship.health,
                size: self.ship.size,
                fire_delay: self.frames_per_shot,
                respawn_delay: self.respawn_rate,
            },
            star: StarTuning {
                size: self.star.size,
                respawn_delay: self.star_respawn_rate,
            },
            boss: BossTuning {
                enabled: self.boss.enabled,
                max_hp: self.boss.health,
                ..defaults.boss
            },
        }
    }

    pub fn star_placements(&self) -> Vec<StarPlacement> {
        self.stars
            .iter()
            .map(|s| StarPlacement {
                loc: Vector2::new(s.x, s.y),
                mass: s.mass,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_file_is_empty_then_defaults_apply() {
        let settings = GameSettings::from_toml("").expect("empty settings");
        assert_eq!(settings, GameSettings::default());
        assert_eq!(settings.tick_interval(), Duration::from_millis(16));
        assert_eq!(settings.star_placements().len(), 1);

        let tuning = settings.world_tuning();
        assert_eq!(tuning.world_size, 750);
        assert_eq!(tuning.ship.fire_delay, 6);
        assert_eq!(tuning.boss.fire_delay, 2);
        assert!(!tuning.boss.enabled);
    }

    #[test]
    fn when_keys_are_given_then_they_reach_the_world_tuning() {
        let text = r#"
            universe_size = 1000
            ms_per_frame = 20
            frames_per_shot = 4
            respawn_rate = 120

            [ship]
            turn = 5.0
            health = 3

            [boss]
            enabled = true
            health = 60

            [[stars]]
            x = 100.0
            y = -50.0
            mass = 0.2

            [[stars]]
            x = -100.0
            y = 50.0
            mass = 0.3
        "#;
        let settings = GameSettings::from_toml(text).expect("valid settings");
        let tuning = settings.world_tuning();

        assert_eq!(tuning.world_size, 1000);
        assert_eq!(tuning.ship.turn_rate, 5.0);
        assert_eq!(tuning.ship.accel_rate, 0.08);
        assert_eq!(tuning.ship.max_hp, 3);
        assert_eq!(tuning.ship.fire_delay, 4);
        assert_eq!(tuning.ship.respawn_delay, 120);
        assert_eq!(tuning.star.respawn_delay, 300);
        assert!(tuning.boss.enabled);
        assert_eq!(tuning.boss.max_hp, 60);
        assert_eq!(settings.tick_interval(), Duration::from_millis(20));

        let stars = settings.star_placements();
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].loc, Vector2::new(100.0, -50.0));
        assert_eq!(stars[1].mass, 0.3);
    }

    #[test]
    fn when_a_rate_is_zero_then_settings_are_rejected() {
        let err = GameSettings::from_toml("ms_per_frame = 0").expect_err("invalid");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "ms_per_frame",
                ..
            }
        ));
    }

    #[test]
    fn when_toml_is_malformed_then_parse_fails() {
        let err = GameSettings::from_toml("universe_size = \"big\"").expect_err("bad type");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn when_file_is_missing_then_load_reports_the_path() {
        let err = GameSettings::load(Path::new("/nonexistent/spacewars.toml")).expect_err("io");
        assert!(err.to_string().contains("/nonexistent/spacewars.toml"));
    }

    #[test]
    fn when_stars_list_is_empty_then_world_has_none() {
        let settings = GameSettings::from_toml("stars = []").expect("valid settings");
        assert!(settings.star_placements().is_empty());
    }
}
