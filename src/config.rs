//! Runtime configuration.
//!
//! Every recognized option has a default mirroring the studio's production
//! setup, so `EngineConfig::default()` is a working configuration. A TOML
//! file can override any subset of fields.

use crate::branches::Branch;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Configuration surface of the acquisition engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Page the schedule is scraped from.
    pub schedule_url: String,
    /// Page the prices are scraped from.
    pub prices_url: String,
    /// Cache freshness window, milliseconds.
    pub ttl_ms: u64,
    /// Outbound fetch budget, milliseconds.
    pub timeout_ms: u64,
    /// Branches in declaration order (order is the resolution tie-break).
    pub branches: Vec<Branch>,
    /// Entries whose text contains any of these (normalized) keywords are
    /// hidden from client views — advanced groups, team line-ups, auditions.
    pub exclusion_keywords: Vec<String>,
    /// Per-branch cap applied by the client view filter.
    pub max_entries_per_branch: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schedule_url: "https://cosmo.su/raspisanie/".to_string(),
            prices_url: "https://cosmo.su/prices/".to_string(),
            ttl_ms: 2 * 60 * 60 * 1000,
            timeout_ms: 15_000,
            branches: vec![
                Branch {
                    name: "Дыбенко".into(),
                    aliases: vec!["дыбенк".into(), "dybenko".into()],
                },
                Branch {
                    name: "Купчино".into(),
                    aliases: vec!["купчин".into(), "kupchino".into()],
                },
                Branch {
                    name: "Звёздная".into(),
                    aliases: vec!["звездн".into(), "zvezdnaya".into()],
                },
                Branch {
                    name: "Озерки".into(),
                    aliases: vec!["озерк".into(), "ozerki".into()],
                },
            ],
            exclusion_keywords: vec![
                "продолжающ".into(),
                "команд".into(),
                "состав".into(),
                "отбор".into(),
                "advanced".into(),
                "pro".into(),
                "выступлен".into(),
            ],
            max_entries_per_branch: 8,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = EngineConfig::default();
        assert_eq!(config.branches.len(), 4);
        assert_eq!(config.max_entries_per_branch, 8);
        assert_eq!(config.ttl(), Duration::from_secs(2 * 60 * 60));
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            ttl_ms = 60000
            max_entries_per_branch = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.ttl_ms, 60_000);
        assert_eq!(config.max_entries_per_branch, 3);
        // Untouched fields keep their defaults
        assert_eq!(config.timeout_ms, 15_000);
        assert_eq!(config.branches.len(), 4);
    }

    #[test]
    fn branches_deserialize_from_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            [[branches]]
            name = "Центр"
            aliases = ["центр"]
            "#,
        )
        .unwrap();
        assert_eq!(config.branches.len(), 1);
        assert_eq!(config.branches[0].name, "Центр");
    }
}
