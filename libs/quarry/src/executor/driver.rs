// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{compiler::CompiledQuery, query_error::BoxError, row::Row};

/// A driver's own failure. The executor passes it through unchanged (as `QueryError::Driver`).
pub type DriverError = BoxError;

/// What a driver reports for one round trip (or one streamed chunk).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    /// Id of the last inserted row, for drivers that report one
    pub insert_id: Option<i64>,
    /// Rows touched by an insert, update or delete
    pub num_affected_rows: Option<u64>,
}

impl QueryResult {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }
}

/// The collaborator performing the actual database round trip.
///
/// Connection management, retries and cursor cleanup are the driver's responsibility. A stream
/// returned by [`Driver::stream_query`] must release its cursor when dropped.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn execute_query(&self, query: &CompiledQuery) -> Result<QueryResult, DriverError>;

    /// Run the query, fetching at most `chunk_size` rows per chunk. Chunks are produced only when
    /// polled.
    fn stream_query<'a>(
        &'a self,
        query: &'a CompiledQuery,
        chunk_size: usize,
    ) -> BoxStream<'a, Result<QueryResult, DriverError>>;

    /// Whether a mutation with a returning clause gives back its rows
    fn supports_returning(&self) -> bool;
}
