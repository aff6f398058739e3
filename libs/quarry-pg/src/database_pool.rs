// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use deadpool_postgres::{Client, Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::{Config, NoTls};
use tracing::debug;

use crate::{config::PgConfig, pg_error::PgDriverError};

pub struct DatabasePool {
    pool: Pool,
}

impl DatabasePool {
    /// Build the pool. Connections are opened lazily, except for the startup check when the
    /// config asks for one.
    pub async fn create(config: &PgConfig) -> Result<Self, PgDriverError> {
        let mut pg_config = Config::from_str(&config.url).map_err(|e| {
            PgDriverError::Delegate(e)
                .with_context("Failed to parse PostgreSQL connection string".into())
        })?;

        if let Some(user) = &config.user {
            pg_config.user(user);
        }
        if let Some(password) = &config.password {
            pg_config.password(password);
        }

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let manager = Manager::from_config(pg_config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.pool_size)
            .build()
            .map_err(|e| PgDriverError::Config(format!("Failed to create DB pool: {e}")))?;

        let db = Self { pool };

        if config.check_connection_on_startup {
            debug!("Checking database connection");
            db.get_client()
                .await
                .map_err(|e| e.with_context("Failed to connect to the database".into()))?;
        }

        Ok(db)
    }

    pub async fn get_client(&self) -> Result<Client, PgDriverError> {
        Ok(self.pool.get().await?)
    }
}
