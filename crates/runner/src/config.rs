use std::env;

use anyhow::Context;
use serde::Deserialize;

/// Runner configuration.
///
/// Loaded from an optional TOML file named by `ROOMBOT_CONFIG`, then
/// overridden field-by-field from `ROOMBOT_*` environment variables. Every
/// field has a default, so running with no config at all works.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Completion endpoint URL.
    pub endpoint: String,
    /// The goal handed to the agent.
    pub goal: String,
    /// Minimum inter-step interval of the agent loop, in milliseconds.
    pub pace_ms: u64,
    /// Seed for obstacle placement; omitted means a fresh layout per run.
    pub seed: Option<u64>,
    /// Number of things spawned into the room.
    pub num_things: usize,
    /// Whole-request timeout for the completion call, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/completion".to_string(),
            goal: "Get within 20 units of the north wall.".to_string(),
            pace_ms: 100,
            seed: None,
            num_things: roombot_core::world::NUM_THINGS,
            request_timeout_secs: 120,
        }
    }
}

impl RunnerConfig {
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match env_string("ROOMBOT_CONFIG") {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config at {path}"))?;
                Self::parse_from_string(&text)?
            }
            None => Self::default(),
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    pub fn parse_from_string(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("Failed to parse TOML")
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Some(endpoint) = env_string("ROOMBOT_LLM_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(goal) = env_string("ROOMBOT_GOAL") {
            self.goal = goal;
        }
        if let Some(pace) = env_string("ROOMBOT_PACE_MS") {
            self.pace_ms = pace.parse().context("ROOMBOT_PACE_MS must be an integer")?;
        }
        if let Some(seed) = env_string("ROOMBOT_SEED") {
            self.seed = Some(seed.parse().context("ROOMBOT_SEED must be an integer")?);
        }
        Ok(())
    }
}

fn env_string(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = RunnerConfig::parse_from_string("").unwrap();
        assert_eq!(cfg, RunnerConfig::default());
    }

    #[test]
    fn toml_overrides_fields() {
        let cfg = RunnerConfig::parse_from_string(
            r#"
            endpoint = "http://10.0.0.2:8080/completion"
            goal = "Find thing3."
            pace_ms = 250
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(cfg.endpoint, "http://10.0.0.2:8080/completion");
        assert_eq!(cfg.goal, "Find thing3.");
        assert_eq!(cfg.pace_ms, 250);
        assert_eq!(cfg.seed, Some(42));
        // Untouched fields keep their defaults.
        assert_eq!(cfg.num_things, RunnerConfig::default().num_things);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(RunnerConfig::parse_from_string("walls = 5\n").is_err());
    }
}
