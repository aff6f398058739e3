// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;
use tokio_postgres::types::Type;

use crate::environment::EnvError;

#[derive(Error, Debug)]
pub enum PgDriverError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Delegate: {0}")]
    Delegate(#[from] tokio_postgres::Error),

    #[error("Pool: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Unsupported column type {ty} for column '{column}'")]
    UnsupportedType { column: String, ty: Type },

    #[error("{0} {1}")]
    WithContext(String, #[source] Box<PgDriverError>),
}

impl PgDriverError {
    pub fn with_context(self, context: String) -> PgDriverError {
        PgDriverError::WithContext(context, Box::new(self))
    }
}

pub trait WithContext {
    fn with_context(self, context: String) -> Self;
}

impl<T> WithContext for Result<T, PgDriverError> {
    fn with_context(self, context: String) -> Result<T, PgDriverError> {
        self.map_err(|e| e.with_context(context))
    }
}
