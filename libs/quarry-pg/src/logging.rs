// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Console logging for applications using this driver.
//!
//! The query executor and the driver are instrumented with `tracing`. [init] installs a global
//! subscriber that prints their events, filtered by the `QUARRY_LOG` environment variable (same
//! syntax as `RUST_LOG`; `warn` when unset). Set `QUARRY_LOG=quarry=debug` to see every
//! statement sent to the database.

use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*, util::TryInitError};

use crate::env_const::QUARRY_LOG;

/// Install the global subscriber. Fails if one is already installed.
pub fn init() -> Result<(), TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(QUARRY_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}
