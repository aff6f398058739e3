// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Environment variables read by the Postgres driver.

pub const QUARRY_POSTGRES_URL: &str = "QUARRY_POSTGRES_URL";
pub const QUARRY_POSTGRES_USER: &str = "QUARRY_POSTGRES_USER";
pub const QUARRY_POSTGRES_PASSWORD: &str = "QUARRY_POSTGRES_PASSWORD";
pub const QUARRY_CONNECTION_POOL_SIZE: &str = "QUARRY_CONNECTION_POOL_SIZE";
pub const QUARRY_CHECK_CONNECTION_ON_STARTUP: &str = "QUARRY_CHECK_CONNECTION_ON_STARTUP";

/// Follows the `RUST_LOG` conventions
pub const QUARRY_LOG: &str = "QUARRY_LOG";

pub const DEFAULT_CONNECTION_POOL_SIZE: usize = 10;
