// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! An in-memory driver for tests of code built on this crate.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use futures::{StreamExt, stream::BoxStream};

use crate::{
    compiler::CompiledQuery,
    executor::{Driver, DriverError, QueryResult},
    row::Row,
};

/// Records every query it receives and answers with canned results.
///
/// `execute_query` pops the next queued result (or returns an empty one). `stream_query` splits
/// the configured stream rows into chunks of the requested size.
#[derive(Debug)]
pub struct MockDriver {
    supports_returning: bool,
    results: Mutex<VecDeque<QueryResult>>,
    stream_rows: Vec<Row>,
    error: Option<String>,
    executed: Mutex<Vec<CompiledQuery>>,
    chunk_sizes: Mutex<Vec<usize>>,
    fetched_chunks: Arc<AtomicUsize>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self {
            supports_returning: true,
            results: Mutex::new(VecDeque::new()),
            stream_rows: vec![],
            error: None,
            executed: Mutex::new(vec![]),
            chunk_sizes: Mutex::new(vec![]),
            fetched_chunks: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave like a database without `RETURNING` (MySQL, for example)
    pub fn without_returning(self) -> Self {
        Self {
            supports_returning: false,
            ..self
        }
    }

    /// Queue the result of the next `execute_query` call
    pub fn with_result(self, result: QueryResult) -> Self {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(result);
        self
    }

    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        self.with_result(QueryResult::from_rows(rows))
    }

    pub fn with_stream_rows(self, rows: Vec<Row>) -> Self {
        Self {
            stream_rows: rows,
            ..self
        }
    }

    /// Fail every call with this message
    pub fn with_error(self, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..self
        }
    }

    /// Queries received so far, by both `execute_query` and `stream_query`
    pub fn executed_queries(&self) -> Vec<CompiledQuery> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn requested_chunk_sizes(&self) -> Vec<usize> {
        self.chunk_sizes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Chunks actually pulled by consumers of `stream_query`
    pub fn fetched_chunks(&self) -> usize {
        self.fetched_chunks.load(Ordering::SeqCst)
    }

    fn record(&self, query: &CompiledQuery) {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn execute_query(&self, query: &CompiledQuery) -> Result<QueryResult, DriverError> {
        self.record(query);

        if let Some(error) = &self.error {
            return Err(error.clone().into());
        }

        Ok(self
            .results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_default())
    }

    fn stream_query<'a>(
        &'a self,
        query: &'a CompiledQuery,
        chunk_size: usize,
    ) -> BoxStream<'a, Result<QueryResult, DriverError>> {
        self.record(query);
        self.chunk_sizes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(chunk_size);

        let chunks: Vec<Result<QueryResult, DriverError>> = match &self.error {
            Some(error) => vec![Err(error.clone().into())],
            None => self
                .stream_rows
                .chunks(chunk_size.max(1))
                .map(|chunk| Ok(QueryResult::from_rows(chunk.to_vec())))
                .collect(),
        };

        let fetched_chunks = self.fetched_chunks.clone();
        futures::stream::iter(chunks)
            .inspect(move |_| {
                fetched_chunks.fetch_add(1, Ordering::SeqCst);
            })
            .boxed()
    }

    fn supports_returning(&self) -> bool {
        self.supports_returning
    }
}
