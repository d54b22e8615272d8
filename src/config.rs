use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, anyhow};

use crate::{filter::FilterMode, sv::Policy, utils};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:promotions.db?mode=rwc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  pub policy: Policy,
  /// Token bucket replenish rate for the HTTP rate limiter.
  pub rate_per_second: u64,
  pub rate_burst: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.into(),
      port: 8080,
      policy: Policy::default(),
      rate_per_second: 10,
      rate_burst: 100,
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Reads every setting through `lookup`, falling back to defaults for
  /// absent keys. Present but malformed values are errors.
  pub fn from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
  ) -> anyhow::Result<Self> {
    let defaults = Self::default();

    let unique_names = match lookup("PROMOTIONS_UNIQUE_NAMES") {
      Some(raw) => utils::parse_bool(&raw).ok_or_else(|| {
        anyhow!("PROMOTIONS_UNIQUE_NAMES must be a boolean, got `{raw}`")
      })?,
      None => defaults.policy.unique_names,
    };

    Ok(Self {
      database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
      port: parse_var(&lookup, "PORT", defaults.port)?,
      policy: Policy {
        unique_names,
        filter_mode: parse_var::<FilterMode>(
          &lookup,
          "PROMOTIONS_FILTER_MODE",
          defaults.policy.filter_mode,
        )?,
      },
      rate_per_second: parse_var(
        &lookup,
        "RATE_LIMIT_PER_SECOND",
        defaults.rate_per_second,
      )?,
      rate_burst: parse_var(&lookup, "RATE_LIMIT_BURST", defaults.rate_burst)?,
    })
  }
}

fn parse_var<T>(
  lookup: &impl Fn(&str) -> Option<String>,
  key: &str,
  default: T,
) -> anyhow::Result<T>
where
  T: FromStr,
  T::Err: Display,
{
  match lookup(key) {
    Some(raw) => raw
      .trim()
      .parse()
      .map_err(|err| anyhow!("{err}"))
      .with_context(|| format!("Invalid {key} value `{raw}`")),
    None => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
    let vars: HashMap<String, String> =
      vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Config::from_lookup(|key| vars.get(key).cloned())
  }

  #[test]
  fn test_defaults() {
    let config = config(&[]).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.port, 8080);
    assert!(!config.policy.unique_names);
    assert_eq!(config.policy.filter_mode, FilterMode::First);
  }

  #[test]
  fn test_overrides() {
    let config = config(&[
      ("DATABASE_URL", "sqlite::memory:"),
      ("PORT", "3000"),
      ("PROMOTIONS_UNIQUE_NAMES", "true"),
      ("PROMOTIONS_FILTER_MODE", "all"),
      ("RATE_LIMIT_PER_SECOND", "5"),
      ("RATE_LIMIT_BURST", "20"),
    ])
    .unwrap();

    assert_eq!(config.database_url, "sqlite::memory:");
    assert_eq!(config.port, 3000);
    assert!(config.policy.unique_names);
    assert_eq!(config.policy.filter_mode, FilterMode::All);
    assert_eq!(config.rate_per_second, 5);
    assert_eq!(config.rate_burst, 20);
  }

  #[test]
  fn test_malformed_values_are_errors() {
    assert!(config(&[("PORT", "eighty")]).is_err());
    assert!(config(&[("PROMOTIONS_UNIQUE_NAMES", "sometimes")]).is_err());
    assert!(config(&[("PROMOTIONS_FILTER_MODE", "any")]).is_err());
  }
}
