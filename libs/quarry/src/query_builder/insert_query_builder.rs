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
    node::{
        ExplainNode, Expression, InsertQueryNode, InsertSource, OnConflictNode, OnDuplicateKeyNode,
        QueryNode,
    },
    parser::{
        InsertObject, InsertValues, UpdateObject, parse_column, parse_insert_values,
        parse_update_object,
    },
    plugin::QueryPlugin,
    query_error::QueryError,
};

use super::{
    Conditional, Executable, ExpressionFactory, MutationOutput, OnConflictBuilder,
    ReturningInterface, mutation_output::shape_mutation_result,
};

#[derive(Debug, Clone)]
pub struct InsertQueryBuilder {
    query_id: QueryId,
    node: Arc<InsertQueryNode>,
    executor: QueryExecutor,
}

impl InsertQueryBuilder {
    pub(crate) fn new(query_id: QueryId, node: InsertQueryNode, executor: QueryExecutor) -> Self {
        Self {
            query_id,
            node: Arc::new(node),
            executor,
        }
    }

    pub fn node(&self) -> &InsertQueryNode {
        &self.node
    }

    /// Rows to insert: one [`InsertObject`] or a list of them.
    ///
    /// Columns come from the rows' keys (see [`parse_insert_values`]) unless `columns` was called
    /// first, in which case every key must be one of those columns. A later call replaces the
    /// rows of an earlier one.
    pub fn values(&self, values: impl Into<InsertValues>) -> Result<Self, QueryError> {
        let explicit_columns = match self.node.values {
            None => self.node.columns.as_deref(),
            Some(_) => None,
        };
        let (columns, source) = parse_insert_values(values.into(), explicit_columns)?;
        Ok(self.with_node(self.node.with_values(columns, source)))
    }

    /// One row built from expression helpers
    pub fn values_with(
        &self,
        build: impl FnOnce(&ExpressionFactory) -> InsertObject,
    ) -> Result<Self, QueryError> {
        self.values(build(&self.expression_factory()))
    }

    /// Fix the column list, for `expression` or for a following `values` call
    pub fn columns(&self, columns: &[&str]) -> Result<Self, QueryError> {
        if matches!(self.node.values, Some(InsertSource::Values(_))) {
            return Err(QueryError::shape(
                "insert columns must be set before the values",
            ));
        }
        let columns = columns.iter().map(|column| parse_column(column)).collect();
        Ok(self.with_node(self.node.with_columns(columns)))
    }

    /// Insert the rows an expression produces, typically a select:
    /// `INSERT INTO "t" ("a") SELECT ...`
    pub fn expression(&self, expression: impl Into<Expression>) -> Self {
        self.with_node(
            self.node
                .with_source(InsertSource::Expression(expression.into())),
        )
    }

    /// `INSERT INTO "t" DEFAULT VALUES`
    pub fn default_values(&self) -> Self {
        self.with_node(
            self.node
                .with_values(Vec::new().into(), InsertSource::DefaultValues),
        )
    }

    /// `INSERT IGNORE` (MySQL) or `INSERT OR IGNORE` (SQLite)
    pub fn ignore(&self) -> Self {
        self.with_node(self.node.with_ignore(true))
    }

    pub fn or_ignore(&self) -> Self {
        self.ignore()
    }

    /// `REPLACE INTO` instead of `INSERT INTO`
    pub fn replace(&self) -> Self {
        self.with_node(self.node.with_replace(true))
    }

    /// Attach an `ON CONFLICT` clause, replacing any attached earlier.
    ///
    /// ```ignore
    /// builder.on_conflict(|oc| oc.column("name").do_update_set([("age", 42)]))?
    /// builder.on_conflict(|oc| Ok(oc.column("name").do_nothing()))?
    /// ```
    pub fn on_conflict<N: Into<OnConflictNode>>(
        &self,
        build: impl FnOnce(OnConflictBuilder) -> Result<N, QueryError>,
    ) -> Result<Self, QueryError> {
        let on_conflict = build(OnConflictBuilder::new(self.expression_factory()))?;
        Ok(self.with_node(self.node.with_on_conflict(on_conflict.into())))
    }

    /// `ON DUPLICATE KEY UPDATE ...` (MySQL), replacing any attached earlier
    pub fn on_duplicate_key_update(
        &self,
        updates: impl Into<UpdateObject>,
    ) -> Result<Self, QueryError> {
        let updates = parse_update_object(updates.into())?;
        Ok(self.with_node(
            self.node
                .with_on_duplicate_key(OnDuplicateKeyNode { updates }),
        ))
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

    fn expression_factory(&self) -> ExpressionFactory {
        ExpressionFactory::new(self.executor.clone())
    }

    fn with_node(&self, node: InsertQueryNode) -> Self {
        Self {
            node: Arc::new(node),
            ..self.clone()
        }
    }
}

impl ReturningInterface for InsertQueryBuilder {
    fn returning_expressions(&self, selections: Vec<Expression>) -> Self {
        self.with_node(self.node.with_returning(selections))
    }
}

impl Conditional for InsertQueryBuilder {}

impl Executable for InsertQueryBuilder {
    type Output = MutationOutput;

    fn query_id(&self) -> &QueryId {
        &self.query_id
    }

    fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    fn to_operation_node(&self) -> QueryNode {
        QueryNode::Insert(self.node.clone())
    }

    fn shape_result(&self, node: &QueryNode, result: QueryResult) -> Vec<MutationOutput> {
        shape_mutation_result(node, result, self.executor.supports_returning())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        compiler::{MysqlDialect, PostgresDialect},
        node::{BinaryOperator, NodeKind},
        query_builder::{QueryCreator, SelectQueryBuilder, WhereInterface},
        testing::MockDriver,
    };

    use super::*;

    fn db() -> QueryCreator {
        QueryCreator::new(Arc::new(PostgresDialect), Arc::new(MockDriver::new()))
    }

    #[test]
    fn single_row() {
        let query = db()
            .insert_into("person")
            .values(InsertObject::from([("first_name", "Jennifer"), ("last_name", "Aniston")]))
            .unwrap()
            .returning(&["id"]);

        let compiled = query.compile().unwrap();
        assert_binding!(
            (compiled.sql, compiled.parameters),
            r#"INSERT INTO "person" ("first_name", "last_name") VALUES ($1, $2) RETURNING "id""#,
            "Jennifer",
            "Aniston"
        );
    }

    #[test]
    fn values_with_expression_helpers() {
        let query = db()
            .insert_into("person")
            .values_with(|eb| {
                InsertObject::new()
                    .set("first_name", eb.fn_("upper", vec![eb.val("jennifer")]))
                    .set("age", eb.raw("40 + ").push_value(2))
            })
            .unwrap();

        let compiled = query.compile().unwrap();
        assert_binding!(
            (compiled.sql, compiled.parameters),
            r#"INSERT INTO "person" ("first_name", "age") VALUES (upper($1), 40 + $2)"#,
            "jennifer",
            2
        );
    }

    #[test]
    fn columns_then_expression() {
        let db = db();
        let pets: SelectQueryBuilder = db
            .select_from("pet")
            .select(&["name"])
            .where_("species", BinaryOperator::Eq, "dog");
        let query = db
            .insert_into("person")
            .columns(&["first_name"])
            .unwrap()
            .expression(pets);

        let compiled = query.compile().unwrap();
        assert_binding!(
            (compiled.sql, compiled.parameters),
            r#"INSERT INTO "person" ("first_name") SELECT "name" FROM "pet" WHERE "species" = $1"#,
            "dog"
        );
    }

    #[test]
    fn columns_after_values_is_a_shape_error() {
        let error = db()
            .insert_into("person")
            .values(InsertObject::from([("first_name", "Jennifer")]))
            .unwrap()
            .columns(&["first_name"])
            .unwrap_err();

        assert!(matches!(error, QueryError::Shape(_)));
    }

    #[test]
    fn columns_without_values_is_a_shape_error() {
        let error = db()
            .insert_into("person")
            .columns(&["first_name", "age"])
            .unwrap()
            .compile()
            .unwrap_err();

        assert!(matches!(error, QueryError::Shape(_)));
    }

    #[test]
    fn default_values() {
        let compiled = db()
            .insert_into("person")
            .default_values()
            .compile()
            .unwrap();

        assert_eq!(compiled.sql, r#"INSERT INTO "person" DEFAULT VALUES"#);
    }

    #[test]
    fn conflict_update_with_excluded_values() {
        let query = db()
            .insert_into("person")
            .values(InsertObject::from([("id", 1), ("age", 40)]))
            .unwrap()
            .on_conflict(|oc| {
                oc.column("id")
                    .do_update_set_with(|eb| UpdateObject::new().set("age", eb.ref_("excluded.age")))
                    .map(|update| update.where_("person.age", BinaryOperator::Lt, 40))
            })
            .unwrap();

        let compiled = query.compile().unwrap();
        assert_binding!(
            (compiled.sql, compiled.parameters),
            r#"INSERT INTO "person" ("id", "age") VALUES ($1, $2) ON CONFLICT ("id") DO UPDATE SET "age" = "excluded"."age" WHERE "person"."age" < $3"#,
            1,
            40,
            40
        );
    }

    #[test]
    fn duplicate_key_on_mysql() {
        let db = QueryCreator::new(Arc::new(MysqlDialect), Arc::new(MockDriver::new()));
        let query = db
            .insert_into("person")
            .ignore()
            .values(InsertObject::from([("id", 1)]))
            .unwrap()
            .on_duplicate_key_update([("id", 2)])
            .unwrap();

        let compiled = query.compile().unwrap();
        assert_binding!(
            (compiled.sql, compiled.parameters),
            "INSERT IGNORE INTO `person` (`id`) VALUES (?) ON DUPLICATE KEY UPDATE `id` = ?",
            1,
            2
        );
    }

    #[test]
    fn returning_is_rejected_by_mysql_at_compile_time() {
        let db = QueryCreator::new(Arc::new(MysqlDialect), Arc::new(MockDriver::new()));
        let query = db
            .insert_into("person")
            .values(InsertObject::from([("id", 1)]))
            .unwrap()
            .returning_all();

        assert!(matches!(
            query.compile(),
            Err(QueryError::Capability {
                kind: NodeKind::Returning,
                ..
            })
        ));
    }

    #[test]
    fn if_then_applies_only_when_true() {
        let base = db()
            .insert_into("person")
            .values(InsertObject::from([("id", 1)]))
            .unwrap();

        let with = base.if_then(true, |b| b.returning(&["id"]));
        let without = base.if_then(false, |b| b.returning(&["id"]));

        assert!(with.node().returning.is_some());
        assert!(without.node().returning.is_none());
        assert_eq!(without.node(), base.node());
    }
}
