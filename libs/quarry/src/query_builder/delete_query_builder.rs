// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::{
    executor::{QueryExecutor, QueryId, QueryResult},
    node::{DeleteQueryNode, ExplainNode, Expression, QueryNode},
    plugin::QueryPlugin,
};

use super::{
    Conditional, Executable, MutationOutput, ReturningInterface, WhereInterface,
    mutation_output::shape_mutation_result,
};

#[derive(Debug, Clone)]
pub struct DeleteQueryBuilder {
    query_id: QueryId,
    node: Arc<DeleteQueryNode>,
    executor: QueryExecutor,
}

impl DeleteQueryBuilder {
    pub(crate) fn new(query_id: QueryId, node: DeleteQueryNode, executor: QueryExecutor) -> Self {
        Self {
            query_id,
            node: Arc::new(node),
            executor,
        }
    }

    pub fn node(&self) -> &DeleteQueryNode {
        &self.node
    }

    pub fn explain(&self, format: Option<&str>, options: Option<Expression>) -> Self {
        self.with_node(self.node.with_explain(ExplainNode {
            format: format.map(str::to_owned),
            options,
        }))
    }

    /// A builder for the same query whose executor also runs `plugin`
    pub fn with_plugin(&self, plugin: impl QueryPlugin + 'static) -> Self {
        Self {
            executor: self.executor.with_plugin(Arc::new(plugin)),
            ..self.clone()
        }
    }

    fn with_node(&self, node: DeleteQueryNode) -> Self {
        Self {
            node: Arc::new(node),
            ..self.clone()
        }
    }
}

impl WhereInterface for DeleteQueryBuilder {
    fn where_expr(&self, predicate: impl Into<Expression>) -> Self {
        self.with_node(self.node.with_where(predicate.into()))
    }
}

impl ReturningInterface for DeleteQueryBuilder {
    fn returning_expressions(&self, selections: Vec<Expression>) -> Self {
        self.with_node(self.node.with_returning(selections))
    }
}

impl Conditional for DeleteQueryBuilder {}

impl Executable for DeleteQueryBuilder {
    type Output = MutationOutput;

    fn query_id(&self) -> &QueryId {
        &self.query_id
    }

    fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    fn to_operation_node(&self) -> QueryNode {
        QueryNode::Delete(self.node.clone())
    }

    fn shape_result(&self, node: &QueryNode, result: QueryResult) -> Vec<MutationOutput> {
        shape_mutation_result(node, result, self.executor.supports_returning())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        compiler::SqliteDialect, node::BinaryOperator, query_builder::QueryCreator,
        testing::MockDriver,
    };

    use super::*;

    #[tokio::test]
    async fn returning_rows() {
        let driver = MockDriver::new().with_rows(vec![[("id", 7)].into_iter().collect()]);
        let db = QueryCreator::new(Arc::new(SqliteDialect), Arc::new(driver));

        let query = db
            .delete_from("person")
            .where_("age", BinaryOperator::Gt, 100)
            .returning(&["id"]);

        let compiled = query.compile().unwrap();
        assert_binding!(
            (compiled.sql, compiled.parameters),
            r#"DELETE FROM "person" WHERE "age" > ? RETURNING "id""#,
            100
        );

        let deleted = query.execute_take_first().await.unwrap();
        assert_eq!(
            deleted
                .as_ref()
                .and_then(|output| output.as_row())
                .and_then(|row| row.get("id"))
                .and_then(|id| id.as_i64()),
            Some(7)
        );
    }
}
