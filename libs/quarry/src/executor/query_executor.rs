// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_stream::try_stream;
use futures::{Stream, StreamExt, stream::BoxStream};
use tracing::{debug, error, instrument, trace};

use crate::{
    compiler::{CompiledQuery, Dialect, QueryCompiler},
    node::QueryNode,
    plugin::QueryPlugin,
    query_error::{QueryError, WithContext},
};

use super::{
    QueryId,
    driver::{Driver, QueryResult},
};

/// Runs the pipeline shared by all builders: query plugins, compilation, driver dispatch and
/// result plugins.
///
/// Executors are values: [`QueryExecutor::with_plugin`] and friends return a new executor and
/// leave the receiver untouched, so builders holding the old one keep their plugin list.
#[derive(Clone)]
pub struct QueryExecutor {
    compiler: QueryCompiler,
    driver: Arc<dyn Driver>,
    plugins: Arc<[Arc<dyn QueryPlugin>]>,
}

impl QueryExecutor {
    pub fn new(dialect: Arc<dyn Dialect>, driver: Arc<dyn Driver>) -> Self {
        Self {
            compiler: QueryCompiler::new(dialect),
            driver,
            plugins: Arc::new([]),
        }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.compiler.dialect()
    }

    pub fn plugins(&self) -> &[Arc<dyn QueryPlugin>] {
        &self.plugins
    }

    pub fn supports_returning(&self) -> bool {
        self.driver.supports_returning()
    }

    /// Apply every plugin's query hook, in registration order
    pub fn transform_query(&self, node: QueryNode, query_id: &QueryId) -> QueryNode {
        self.plugins.iter().fold(node, |node, plugin| {
            trace!(%query_id, "Applying query plugin");
            plugin.transform_query(node, query_id)
        })
    }

    pub fn compile_query(
        &self,
        node: QueryNode,
        query_id: &QueryId,
    ) -> Result<CompiledQuery, QueryError> {
        self.compiler.compile(node, query_id.clone())
    }

    #[instrument(
        name = "QueryExecutor::execute_query"
        level = "trace"
        skip_all
        fields(
            query_id = %query.query_id
            )
        )]
    pub async fn execute_query(&self, query: &CompiledQuery) -> Result<QueryResult, QueryError> {
        debug!("Executing SQL operation: {}", query.sql);

        let result = self.driver.execute_query(query).await.map_err(|e| {
            error!("Failed to execute query: {e:?}");
            QueryError::Driver(e)
        })?;

        apply_result_plugins(&self.plugins, result, &query.query_id).await
    }

    /// A lazy stream of result chunks. Nothing is sent to the driver until the stream is first
    /// polled, and each chunk goes through the result plugins before it is yielded.
    pub fn stream_query(
        &self,
        query: CompiledQuery,
        chunk_size: usize,
    ) -> BoxStream<'static, Result<QueryResult, QueryError>> {
        result_chunks(self.driver.clone(), self.plugins.clone(), query, chunk_size).boxed()
    }

    /// A new executor with `plugin` run after the existing ones
    pub fn with_plugin(&self, plugin: Arc<dyn QueryPlugin>) -> Self {
        self.with_plugins(vec![plugin])
    }

    /// A new executor with `plugin` run before the existing ones
    pub fn with_plugin_at_front(&self, plugin: Arc<dyn QueryPlugin>) -> Self {
        Self {
            plugins: std::iter::once(plugin)
                .chain(self.plugins.iter().cloned())
                .collect(),
            ..self.clone()
        }
    }

    pub fn with_plugins(&self, plugins: Vec<Arc<dyn QueryPlugin>>) -> Self {
        Self {
            plugins: self.plugins.iter().cloned().chain(plugins).collect(),
            ..self.clone()
        }
    }

    pub fn without_plugins(&self) -> Self {
        Self {
            plugins: Arc::new([]),
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("dialect", &self.dialect().name())
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

async fn apply_result_plugins(
    plugins: &[Arc<dyn QueryPlugin>],
    mut result: QueryResult,
    query_id: &QueryId,
) -> Result<QueryResult, QueryError> {
    for plugin in plugins {
        trace!(%query_id, "Applying result plugin");
        result = plugin
            .transform_result(result, query_id)
            .await
            .with_context(format!("Result plugin failed for query {query_id}"))?;
    }
    Ok(result)
}

fn result_chunks(
    driver: Arc<dyn Driver>,
    plugins: Arc<[Arc<dyn QueryPlugin>]>,
    query: CompiledQuery,
    chunk_size: usize,
) -> impl Stream<Item = Result<QueryResult, QueryError>> + Send + 'static {
    try_stream! {
        debug!("Streaming SQL operation: {}", query.sql);

        let mut chunks = driver.stream_query(&query, chunk_size);
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| {
                error!("Failed to fetch query chunk: {e:?}");
                QueryError::Driver(e)
            })?;
            let chunk = apply_result_plugins(&plugins, chunk, &query.query_id).await?;
            yield chunk;
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use futures::TryStreamExt;

    use crate::{
        compiler::PostgresDialect,
        node::{DeleteQueryNode, TableNode},
        row::Row,
        testing::MockDriver,
    };

    use super::*;

    /// Appends its tag to the deleted table's name and to each row's `seen` column
    struct Tagging(&'static str);

    #[async_trait]
    impl QueryPlugin for Tagging {
        fn transform_query(&self, node: QueryNode, _query_id: &QueryId) -> QueryNode {
            match node {
                QueryNode::Delete(delete) => {
                    let table = TableNode::new(format!("{}_{}", delete.from.name, self.0));
                    DeleteQueryNode::new(table).into()
                }
                other => other,
            }
        }

        async fn transform_result(
            &self,
            mut result: QueryResult,
            _query_id: &QueryId,
        ) -> Result<QueryResult, QueryError> {
            for row in result.rows.iter_mut() {
                let seen = row
                    .get("seen")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_owned();
                row.insert("seen", format!("{seen}{}", self.0));
            }
            Ok(result)
        }
    }

    fn executor(driver: MockDriver) -> QueryExecutor {
        QueryExecutor::new(Arc::new(PostgresDialect), Arc::new(driver))
    }

    #[test]
    fn plugins_run_in_registration_order() {
        let executor = executor(MockDriver::new())
            .with_plugin(Arc::new(Tagging("a")))
            .with_plugin(Arc::new(Tagging("b")))
            .with_plugin_at_front(Arc::new(Tagging("z")));

        let node = executor.transform_query(
            DeleteQueryNode::new(TableNode::new("person")).into(),
            &QueryId::new(),
        );

        let QueryNode::Delete(delete) = node else {
            panic!("Expected a delete node");
        };
        assert_eq!(delete.from.name, "person_z_a_b");
    }

    #[test]
    fn with_plugin_leaves_original_untouched() {
        let base = executor(MockDriver::new());
        let extended = base.with_plugin(Arc::new(Tagging("a")));

        assert_eq!(base.plugins().len(), 0);
        assert_eq!(extended.plugins().len(), 1);
        assert_eq!(extended.without_plugins().plugins().len(), 0);
    }

    #[tokio::test]
    async fn result_plugins_apply_after_driver() {
        let row: Row = [("seen", "")].into_iter().collect();
        let driver = MockDriver::new().with_result(QueryResult::from_rows(vec![row]));
        let executor = executor(driver)
            .with_plugin(Arc::new(Tagging("a")))
            .with_plugin(Arc::new(Tagging("b")));

        let compiled = executor
            .compile_query(
                DeleteQueryNode::new(TableNode::new("person")).into(),
                &QueryId::new(),
            )
            .unwrap();
        let result = executor.execute_query(&compiled).await.unwrap();

        assert_eq!(result.rows[0].get("seen").and_then(|v| v.as_str()), Some("ab"));
    }

    #[tokio::test]
    async fn result_plugins_apply_per_chunk() {
        let rows: Vec<Row> = (0..3)
            .map(|_| [("seen", "")].into_iter().collect())
            .collect();
        let driver = MockDriver::new().with_stream_rows(rows);
        let executor = executor(driver).with_plugin(Arc::new(Tagging("x")));

        let compiled = executor
            .compile_query(
                DeleteQueryNode::new(TableNode::new("person")).into(),
                &QueryId::new(),
            )
            .unwrap();
        let chunks: Vec<QueryResult> = executor
            .stream_query(compiled, 2)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(chunks.len(), 2);
        assert!(
            chunks
                .iter()
                .flat_map(|chunk| chunk.rows.iter())
                .all(|row| row.get("seen").and_then(|v| v.as_str()) == Some("x"))
        );
    }

    #[tokio::test]
    async fn driver_errors_pass_through() {
        let driver = MockDriver::new().with_error("connection refused");
        let executor = executor(driver);

        let compiled = executor
            .compile_query(
                DeleteQueryNode::new(TableNode::new("person")).into(),
                &QueryId::new(),
            )
            .unwrap();
        let error = executor.execute_query(&compiled).await.unwrap_err();

        match error {
            QueryError::Driver(e) => assert_eq!(e.to_string(), "connection refused"),
            other => panic!("Expected a driver error, got {other:?}"),
        }
    }

    struct Rejecting;

    #[async_trait]
    impl QueryPlugin for Rejecting {
        fn transform_query(&self, node: QueryNode, _query_id: &QueryId) -> QueryNode {
            node
        }

        async fn transform_result(
            &self,
            _result: QueryResult,
            _query_id: &QueryId,
        ) -> Result<QueryResult, QueryError> {
            Err(QueryError::Plugin("row limit exceeded".into()))
        }
    }

    #[tokio::test]
    async fn result_plugin_errors_name_the_query() {
        let executor = executor(MockDriver::new()).with_plugin(Arc::new(Rejecting));
        let query_id = QueryId::new();

        let compiled = executor
            .compile_query(
                DeleteQueryNode::new(TableNode::new("person")).into(),
                &query_id,
            )
            .unwrap();
        let error = executor.execute_query(&compiled).await.unwrap_err();

        match error {
            QueryError::WithContext(context, source) => {
                assert_eq!(context, format!("Result plugin failed for query {query_id}"));
                assert!(matches!(
                    *source,
                    QueryError::Plugin(ref message) if message == "row limit exceeded"
                ));
            }
            other => panic!("Expected a plugin error with context, got {other:?}"),
        }
    }
}
