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
    compiler::Dialect,
    executor::{Driver, QueryExecutor, QueryId},
    node::{DeleteQueryNode, InsertQueryNode, SelectQueryNode, UpdateQueryNode},
    parser::{parse_from_item, parse_table},
    plugin::{QueryPlugin, WithSchemaPlugin},
};

use super::{
    DeleteQueryBuilder, ExpressionFactory, InsertQueryBuilder, SelectQueryBuilder,
    UpdateQueryBuilder,
};

/// The entry point for building queries against one database.
///
/// Every builder started here gets a fresh [`QueryId`] and a copy of this creator's executor, so
/// plugins added later (through [`QueryCreator::with_plugin`]) only affect builders started from
/// the returned creator.
#[derive(Debug, Clone)]
pub struct QueryCreator {
    executor: QueryExecutor,
}

impl QueryCreator {
    pub fn new(dialect: Arc<dyn Dialect>, driver: Arc<dyn Driver>) -> Self {
        Self::from_executor(QueryExecutor::new(dialect, driver))
    }

    pub fn from_executor(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// `table` may carry a schema: `"public.person"`
    pub fn insert_into(&self, table: &str) -> InsertQueryBuilder {
        InsertQueryBuilder::new(
            QueryId::new(),
            InsertQueryNode::new(parse_table(table)),
            self.executor.clone(),
        )
    }

    pub fn replace_into(&self, table: &str) -> InsertQueryBuilder {
        self.insert_into(table).replace()
    }

    /// `from` may carry a schema and an alias: `"public.person as p"`
    pub fn select_from(&self, from: &str) -> SelectQueryBuilder {
        SelectQueryBuilder::new(
            QueryId::new(),
            SelectQueryNode::new(vec![parse_from_item(from)]),
            self.executor.clone(),
        )
    }

    /// `SELECT ... FROM (<query>) AS "<alias>"`
    pub fn select_from_subquery(
        &self,
        query: &SelectQueryBuilder,
        alias: &str,
    ) -> SelectQueryBuilder {
        SelectQueryBuilder::new(
            QueryId::new(),
            SelectQueryNode::new(vec![query.as_from_item(alias)]),
            self.executor.clone(),
        )
    }

    pub fn update_table(&self, table: &str) -> UpdateQueryBuilder {
        UpdateQueryBuilder::new(
            QueryId::new(),
            UpdateQueryNode::new(parse_table(table)),
            self.executor.clone(),
        )
    }

    pub fn delete_from(&self, table: &str) -> DeleteQueryBuilder {
        DeleteQueryBuilder::new(
            QueryId::new(),
            DeleteQueryNode::new(parse_table(table)),
            self.executor.clone(),
        )
    }

    pub fn expression_factory(&self) -> ExpressionFactory {
        ExpressionFactory::new(self.executor.clone())
    }

    /// A creator whose builders also run `plugin`, after the plugins already installed
    pub fn with_plugin(&self, plugin: impl QueryPlugin + 'static) -> Self {
        Self::from_executor(self.executor.with_plugin(Arc::new(plugin)))
    }

    /// A creator that qualifies every unqualified table with `schema`. The schema plugin runs
    /// before the other plugins, so they see qualified tables.
    pub fn with_schema(&self, schema: &str) -> Self {
        Self::from_executor(
            self.executor
                .with_plugin_at_front(Arc::new(WithSchemaPlugin::new(schema))),
        )
    }

    pub fn without_plugins(&self) -> Self {
        Self::from_executor(self.executor.without_plugins())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        compiler::PostgresDialect,
        node::BinaryOperator,
        plugin::CamelCasePlugin,
        query_builder::{Executable, WhereInterface},
        testing::MockDriver,
    };

    use super::*;

    #[test]
    fn each_builder_gets_its_own_query_id() {
        let db = QueryCreator::new(Arc::new(PostgresDialect), Arc::new(MockDriver::new()));

        let first = db.select_from("person");
        let second = db.select_from("person");

        assert_ne!(first.query_id(), second.query_id());
        assert_eq!(first.node(), second.node());
    }

    #[test]
    fn subquery_as_from_item() {
        let db = QueryCreator::new(Arc::new(PostgresDialect), Arc::new(MockDriver::new()));
        let adults = db
            .select_from("person")
            .where_expr(db.expression_factory().cmp("age", BinaryOperator::Gte, 18));

        let compiled = db
            .select_from_subquery(&adults, "adults")
            .select(&["adults.first_name"])
            .compile()
            .unwrap();

        assert_binding!(
            (compiled.sql, compiled.parameters),
            r#"SELECT "adults"."first_name" FROM (SELECT * FROM "person" WHERE "age" >= $1) AS "adults""#,
            18
        );
    }

    #[test]
    fn plugins_are_scoped_to_the_returned_creator() {
        let db = QueryCreator::new(Arc::new(PostgresDialect), Arc::new(MockDriver::new()));
        let camel = db.with_plugin(CamelCasePlugin::new()).with_schema("app");

        assert!(db.executor().plugins().is_empty());
        assert_eq!(camel.executor().plugins().len(), 2);
        assert!(camel.without_plugins().executor().plugins().is_empty());

        let compiled = camel
            .select_from("personPets")
            .select(&["firstName"])
            .compile()
            .unwrap();
        assert_eq!(
            compiled.sql,
            r#"SELECT "first_name" FROM "app"."person_pets""#
        );
    }
}
