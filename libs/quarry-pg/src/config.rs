// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    env_const::{
        DEFAULT_CONNECTION_POOL_SIZE, QUARRY_CHECK_CONNECTION_ON_STARTUP,
        QUARRY_CONNECTION_POOL_SIZE, QUARRY_POSTGRES_PASSWORD, QUARRY_POSTGRES_URL,
        QUARRY_POSTGRES_USER,
    },
    environment::{Environment, get_parsed},
    pg_error::PgDriverError,
};

/// Connection settings for [crate::PostgresDriver].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgConfig {
    /// A `postgres://` URL or a key/value connection string
    pub url: String,
    /// Overrides the user in `url`
    pub user: Option<String>,
    /// Overrides the password in `url`
    pub password: Option<String>,
    pub pool_size: usize,
    /// Obtain (and release) one connection when the pool is created, so a bad URL is reported
    /// immediately instead of on the first query
    pub check_connection_on_startup: bool,
}

impl PgConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: None,
            password: None,
            pool_size: DEFAULT_CONNECTION_POOL_SIZE,
            check_connection_on_startup: true,
        }
    }

    pub fn from_env(env: &dyn Environment) -> Result<Self, PgDriverError> {
        let url = env.get(QUARRY_POSTGRES_URL).ok_or_else(|| {
            PgDriverError::Config(format!("Env {QUARRY_POSTGRES_URL} must be provided"))
        })?;

        let pool_size = get_parsed::<usize>(env, QUARRY_CONNECTION_POOL_SIZE)?
            .unwrap_or(DEFAULT_CONNECTION_POOL_SIZE);
        if pool_size == 0 {
            return Err(PgDriverError::Config(format!(
                "Env {QUARRY_CONNECTION_POOL_SIZE} must be positive"
            )));
        }

        Ok(Self {
            url,
            user: env.get(QUARRY_POSTGRES_USER),
            password: env.get(QUARRY_POSTGRES_PASSWORD),
            pool_size,
            check_connection_on_startup: env.enabled(QUARRY_CHECK_CONNECTION_ON_STARTUP, true)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::environment::MapEnvironment;

    use super::*;

    #[test]
    fn defaults() {
        let env = MapEnvironment::from([(QUARRY_POSTGRES_URL, "postgres://localhost/app")]);

        assert_eq!(
            PgConfig::from_env(&env).unwrap(),
            PgConfig::new("postgres://localhost/app")
        );
    }

    #[test]
    fn overrides() {
        let env = MapEnvironment::from([
            (QUARRY_POSTGRES_URL, "postgres://localhost/app"),
            (QUARRY_POSTGRES_USER, "app_user"),
            (QUARRY_POSTGRES_PASSWORD, "secret"),
            (QUARRY_CONNECTION_POOL_SIZE, "3"),
            (QUARRY_CHECK_CONNECTION_ON_STARTUP, "false"),
        ]);

        let config = PgConfig::from_env(&env).unwrap();

        assert_eq!(config.user.as_deref(), Some("app_user"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.pool_size, 3);
        assert!(!config.check_connection_on_startup);
    }

    #[test]
    fn invalid_settings() {
        let missing_url = MapEnvironment::new();
        assert!(matches!(
            PgConfig::from_env(&missing_url),
            Err(PgDriverError::Config(_))
        ));

        let zero_pool = MapEnvironment::from([
            (QUARRY_POSTGRES_URL, "postgres://localhost/app"),
            (QUARRY_CONNECTION_POOL_SIZE, "0"),
        ]);
        assert!(matches!(
            PgConfig::from_env(&zero_pool),
            Err(PgDriverError::Config(_))
        ));

        let bad_flag = MapEnvironment::from([
            (QUARRY_POSTGRES_URL, "postgres://localhost/app"),
            (QUARRY_CHECK_CONNECTION_ON_STARTUP, "sometimes"),
        ]);
        assert!(matches!(
            PgConfig::from_env(&bad_flag),
            Err(PgDriverError::Env(_))
        ));
    }
}
