// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};

use crate::{
    compiler::CompiledQuery,
    executor::{QueryExecutor, QueryId, QueryResult},
    node::QueryNode,
    query_error::{OnNoResult, QueryError},
    row::Row,
};

/// Rows fetched per driver round trip by [`Executable::stream`]
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 100;

/// The terminal operations shared by every builder.
///
/// Implementors supply their identity, executor and current root; compilation, execution and
/// streaming are provided. Nothing is cached: every call goes through the plugins and the
/// compiler again.
#[async_trait]
pub trait Executable: Send + Sync {
    /// One element of what [`Executable::execute`] returns
    type Output: Send;

    fn query_id(&self) -> &QueryId;

    fn executor(&self) -> &QueryExecutor;

    /// The root node as built, before any plugin has seen it
    fn to_operation_node(&self) -> QueryNode;

    /// Turn the driver's result into the output rows. `node` is the compiled (plugin-transformed)
    /// root.
    fn shape_result(&self, node: &QueryNode, result: QueryResult) -> Vec<Self::Output>;

    /// Apply the query plugins and compile, without executing.
    fn compile(&self) -> Result<CompiledQuery, QueryError> {
        let node = self
            .executor()
            .transform_query(self.to_operation_node(), self.query_id());
        self.executor().compile_query(node, self.query_id())
    }

    async fn execute_compiled(
        &self,
        compiled: &CompiledQuery,
    ) -> Result<Vec<Self::Output>, QueryError> {
        let result = self.executor().execute_query(compiled).await?;
        Ok(self.shape_result(&compiled.query, result))
    }

    async fn execute(&self) -> Result<Vec<Self::Output>, QueryError> {
        let compiled = self.compile()?;
        self.execute_compiled(&compiled).await
    }

    /// The first output, or `None` if there is none
    async fn execute_take_first(&self) -> Result<Option<Self::Output>, QueryError> {
        Ok(self.execute().await?.into_iter().next())
    }

    /// The first output, failing with [`QueryError::NoResult`] if there is none
    async fn execute_take_first_or_fail(&self) -> Result<Self::Output, QueryError> {
        self.execute_take_first_or_fail_with(OnNoResult::Default).await
    }

    /// The first output, failing as `on_no_result` dictates if there is none
    async fn execute_take_first_or_fail_with(
        &self,
        on_no_result: OnNoResult,
    ) -> Result<Self::Output, QueryError> {
        let compiled = self.compile()?;
        let outputs = self.execute_compiled(&compiled).await?;

        outputs
            .into_iter()
            .next()
            .ok_or_else(|| on_no_result.into_error(&compiled.query))
    }

    /// Stream the rows, fetching [`DEFAULT_STREAM_CHUNK_SIZE`] rows at a time
    fn stream(&self) -> Result<BoxStream<'static, Result<Row, QueryError>>, QueryError> {
        self.stream_with_chunk_size(DEFAULT_STREAM_CHUNK_SIZE)
    }

    /// Stream the rows, fetching `chunk_size` rows at a time.
    ///
    /// The query is compiled eagerly (so capability errors surface here), but nothing is sent to
    /// the driver until the stream is polled. A stream can't be restarted; call this again to run
    /// the query again.
    fn stream_with_chunk_size(
        &self,
        chunk_size: usize,
    ) -> Result<BoxStream<'static, Result<Row, QueryError>>, QueryError> {
        if chunk_size == 0 {
            return Err(QueryError::shape("stream chunk size must be positive"));
        }

        let compiled = self.compile()?;
        Ok(self
            .executor()
            .stream_query(compiled, chunk_size)
            .map_ok(|chunk| {
                futures::stream::iter(chunk.rows.into_iter().map(Ok::<Row, QueryError>))
            })
            .try_flatten()
            .boxed())
    }
}
