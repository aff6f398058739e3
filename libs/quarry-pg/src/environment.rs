// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{collections::HashMap, sync::Arc};

/// Source of configuration values. Tests supply a [MapEnvironment] instead of touching the
/// process environment.
pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// A boolean flag, accepting `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`
    fn enabled(&self, key: &str, default_value: bool) -> Result<bool, EnvError> {
        match self.get(key) {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(EnvError::InvalidBoolean {
                    key: key.to_string(),
                    value,
                }),
            },
            None => Ok(default_value),
        }
    }
}

/// Parse the value of `key`, if set
pub fn get_parsed<T: std::str::FromStr>(
    env: &dyn Environment,
    key: &str,
) -> Result<Option<T>, EnvError> {
    env.get(key)
        .map(|value| {
            value.trim().parse().map_err(|_| EnvError::InvalidValue {
                key: key.to_string(),
                value,
            })
        })
        .transpose()
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid value for {key}: {value}. Expected true, 1, yes, on OR false, 0, no, off")]
    InvalidBoolean { key: String, value: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Values held in memory, optionally backed by another environment for missing keys.
#[derive(Clone, Default)]
pub struct MapEnvironment {
    values: HashMap<String, String>,
    fallback: Option<Arc<dyn Environment>>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: Arc<dyn Environment>) -> Self {
        Self {
            values: HashMap::new(),
            fallback: Some(fallback),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl Environment for MapEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| self.fallback.as_ref().and_then(|fb| fb.get(key)))
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MapEnvironment {
    fn from(values: [(&str, &str); N]) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fallback: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans() {
        let env = MapEnvironment::from([("A", "Yes"), ("B", "off"), ("C", "maybe")]);

        assert!(env.enabled("A", false).unwrap());
        assert!(!env.enabled("B", true).unwrap());
        assert!(env.enabled("MISSING", true).unwrap());
        assert!(matches!(
            env.enabled("C", true),
            Err(EnvError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn fallback_fills_missing_keys() {
        let base = Arc::new(MapEnvironment::from([("A", "base"), ("B", "base")]));
        let mut env = MapEnvironment::with_fallback(base);
        env.set("A", "override");

        assert_eq!(env.get("A").as_deref(), Some("override"));
        assert_eq!(env.get("B").as_deref(), Some("base"));
        assert_eq!(env.get("C"), None);
    }

    #[test]
    fn parsed_values() {
        let env = MapEnvironment::from([("SIZE", " 4 "), ("BAD", "four")]);

        assert_eq!(get_parsed::<usize>(&env, "SIZE").unwrap(), Some(4));
        assert_eq!(get_parsed::<usize>(&env, "MISSING").unwrap(), None);
        assert!(matches!(
            get_parsed::<usize>(&env, "BAD"),
            Err(EnvError::InvalidValue { .. })
        ));
    }
}
