//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use crate::game::controller::ControllerConfig;
use crate::game::state::Side;
use crate::util::time::{Speed, DEFAULT_SPEED_INDEX, SPEED_LADDER};

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,

    /// Engine seed; random when unset
    pub match_seed: u64,
    /// Initial index on the speed ladder
    pub match_speed: usize,
    pub command_queue_capacity: usize,
    pub notification_queue_capacity: usize,

    pub home_club: String,
    pub away_club: String,
    /// Side steered by the local user (`none` for a spectator run)
    pub controlled_side: Option<Side>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::invalid("LOG_FORMAT", other)),
        };

        let match_seed = match lookup("MATCH_SEED") {
            Some(v) => parse("MATCH_SEED", &v)?,
            None => rand::random(),
        };

        let match_speed = match lookup("MATCH_SPEED") {
            Some(v) => {
                let index: usize = parse("MATCH_SPEED", &v)?;
                if index >= SPEED_LADDER.len() {
                    return Err(ConfigError::invalid("MATCH_SPEED", &v));
                }
                index
            }
            None => DEFAULT_SPEED_INDEX,
        };

        let controlled_side = match lookup("CONTROLLED_SIDE").as_deref() {
            None | Some("home") => Some(Side::Home),
            Some("away") => Some(Side::Away),
            Some("none") => None,
            Some(other) => return Err(ConfigError::invalid("CONTROLLED_SIDE", other)),
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
            match_seed,
            match_speed,
            command_queue_capacity: capacity(&lookup, "COMMAND_QUEUE_CAPACITY", 32)?,
            notification_queue_capacity: capacity(&lookup, "NOTIFICATION_QUEUE_CAPACITY", 16)?,
            home_club: lookup("HOME_CLUB").unwrap_or_else(|| "Arsenal".to_string()),
            away_club: lookup("AWAY_CLUB").unwrap_or_else(|| "Manchester City".to_string()),
            controlled_side,
        })
    }

    /// Settings handed to each match controller
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            seed: self.match_seed,
            speed: Speed::new(self.match_speed),
            command_capacity: self.command_queue_capacity,
            notification_capacity: self.notification_queue_capacity,
            controlled_side: self.controlled_side,
        }
    }
}

fn parse<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::invalid(var, value))
}

fn capacity<F>(lookup: &F, var: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(v) => match parse::<usize>(var, &v)? {
            0 => Err(ConfigError::invalid(var, &v)),
            n => Ok(n),
        },
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.match_speed, 2);
        assert_eq!(config.command_queue_capacity, 32);
        assert_eq!(config.notification_queue_capacity, 16);
        assert_eq!(config.home_club, "Arsenal");
        assert_eq!(config.away_club, "Manchester City");
        assert_eq!(config.controlled_side, Some(Side::Home));
    }

    #[test]
    fn test_overrides_flow_into_controller_config() {
        let config = load(&[
            ("MATCH_SEED", "42"),
            ("MATCH_SPEED", "0"),
            ("CONTROLLED_SIDE", "none"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        let cc = config.controller_config();
        assert_eq!(cc.seed, 42);
        assert_eq!(cc.speed.index(), 0);
        assert_eq!(cc.controlled_side, None);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            load(&[("MATCH_SPEED", "7")]),
            Err(ConfigError::Invalid { var: "MATCH_SPEED", .. })
        ));
        assert!(load(&[("MATCH_SEED", "abc")]).is_err());
        assert!(load(&[("COMMAND_QUEUE_CAPACITY", "0")]).is_err());
        assert!(load(&[("CONTROLLED_SIDE", "both")]).is_err());
    }
}
