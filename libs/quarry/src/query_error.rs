// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use crate::node::{NodeKind, QueryNode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum QueryError {
    /// Malformed input to a builder method (empty row list, unknown column, ...), reported by the
    /// builder call itself. A statement left incomplete, such as an update without `set` or an
    /// insert naming columns without values, is reported when it is compiled.
    #[error("Shape error: {0}")]
    Shape(String),

    /// The query uses a construct the active dialect cannot render.
    #[error("Dialect '{dialect}' does not support {kind}")]
    Capability {
        dialect: &'static str,
        kind: NodeKind,
    },

    #[error(transparent)]
    NoResult(#[from] NoResultError),

    /// A caller-supplied error returned in place of [`NoResultError`]
    #[error("{0}")]
    Custom(BoxError),

    /// The driver's own failure, passed through untouched
    #[error("Driver: {0}")]
    Driver(#[source] BoxError),

    #[error("Plugin: {0}")]
    Plugin(String),

    #[error("{0} {1}")]
    WithContext(String, #[source] Box<QueryError>),
}

impl QueryError {
    pub fn with_context(self, context: String) -> QueryError {
        QueryError::WithContext(context, Box::new(self))
    }

    pub(crate) fn shape(message: impl Into<String>) -> QueryError {
        QueryError::Shape(message.into())
    }
}

pub trait WithContext {
    fn with_context(self, context: String) -> Self;
}

impl<T> WithContext for Result<T, QueryError> {
    fn with_context(self, context: String) -> Result<T, QueryError> {
        self.map_err(|e| e.with_context(context))
    }
}

/// Raised by `execute_take_first_or_fail` when the query produced no rows.
#[derive(Error, Debug)]
#[error("No result for {} query", .node.kind())]
pub struct NoResultError {
    /// The (plugin-transformed) query that produced no rows
    pub node: QueryNode,
}

/// What `execute_take_first_or_fail_with` reports when there is no row.
pub enum OnNoResult {
    /// [`QueryError::NoResult`]
    Default,
    /// Report this error instead (as [`QueryError::Custom`])
    Error(BoxError),
    /// Build the error from the query that produced no rows (as [`QueryError::Custom`])
    Build(Box<dyn FnOnce(&QueryNode) -> BoxError + Send>),
}

impl OnNoResult {
    pub fn error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        OnNoResult::Error(Box::new(error))
    }

    pub fn build<E, F>(build: F) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
        F: FnOnce(&QueryNode) -> E + Send + 'static,
    {
        OnNoResult::Build(Box::new(move |node| Box::new(build(node))))
    }

    pub(crate) fn into_error(self, node: &QueryNode) -> QueryError {
        match self {
            OnNoResult::Default => NoResultError { node: node.clone() }.into(),
            OnNoResult::Error(error) => QueryError::Custom(error),
            OnNoResult::Build(build) => QueryError::Custom(build(node)),
        }
    }
}

impl std::fmt::Debug for OnNoResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnNoResult::Default => f.write_str("OnNoResult::Default"),
            OnNoResult::Error(error) => write!(f, "OnNoResult::Error({error:?})"),
            OnNoResult::Build(_) => f.write_str("OnNoResult::Build"),
        }
    }
}
