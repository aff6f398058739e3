// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A Postgres [quarry::Driver] built on `tokio-postgres` and a `deadpool` connection pool.
//!
//! ```ignore
//! let driver = PostgresDriver::from_env(&SystemEnvironment).await?;
//! let db = quarry_pg::query_creator(driver);
//! ```

mod config;
mod database_pool;
pub mod env_const;
mod environment;
pub mod logging;
mod pg_driver;
mod pg_error;
mod pg_value;

use std::sync::Arc;

use quarry::{PostgresDialect, QueryCreator};

pub use config::PgConfig;
pub use database_pool::DatabasePool;
pub use environment::{EnvError, Environment, MapEnvironment, SystemEnvironment};
pub use pg_driver::PostgresDriver;
pub use pg_error::{PgDriverError, WithContext};
pub use pg_value::{PgParam, to_row};

/// A query creator compiling for Postgres and running on `driver`
pub fn query_creator(driver: PostgresDriver) -> QueryCreator {
    QueryCreator::new(Arc::new(PostgresDialect), Arc::new(driver))
}
