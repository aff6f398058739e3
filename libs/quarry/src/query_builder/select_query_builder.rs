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
        BinaryOperator, ExplainNode, Expression, FromItem, JoinKind, JoinNode, OrderByItemNode,
        Ordering, QueryNode, SelectQueryNode, TableNode,
    },
    parser::{parse_from_item, parse_reference, parse_selection},
    plugin::QueryPlugin,
    row::Row,
};

use super::{Conditional, Executable, WhereInterface};

#[derive(Debug, Clone)]
pub struct SelectQueryBuilder {
    query_id: QueryId,
    node: Arc<SelectQueryNode>,
    executor: QueryExecutor,
}

impl SelectQueryBuilder {
    pub(crate) fn new(query_id: QueryId, node: SelectQueryNode, executor: QueryExecutor) -> Self {
        Self {
            query_id,
            node: Arc::new(node),
            executor,
        }
    }

    pub fn node(&self) -> &SelectQueryNode {
        &self.node
    }

    /// References with optional aliases: `["id", "person.first_name as name"]`
    pub fn select(&self, selections: &[&str]) -> Self {
        self.select_expr(
            selections
                .iter()
                .map(|selection| parse_selection(selection))
                .collect(),
        )
    }

    pub fn select_expr(&self, selections: Vec<Expression>) -> Self {
        self.with_node(self.node.with_selections(selections))
    }

    pub fn select_all(&self) -> Self {
        self.select_expr(vec![Expression::Star(None)])
    }

    /// `"<table>".*`
    pub fn select_all_from(&self, table: &str) -> Self {
        self.select_expr(vec![Expression::Star(Some(TableNode::new(table)))])
    }

    pub fn distinct(&self) -> Self {
        self.with_node(self.node.with_distinct(true))
    }

    /// `INNER JOIN <table> ON <lhs> = <rhs>`
    pub fn inner_join(&self, table: &str, lhs: &str, rhs: &str) -> Self {
        self.join_on(JoinKind::Inner, table, lhs, rhs)
    }

    /// `LEFT JOIN <table> ON <lhs> = <rhs>`
    pub fn left_join(&self, table: &str, lhs: &str, rhs: &str) -> Self {
        self.join_on(JoinKind::Left, table, lhs, rhs)
    }

    pub fn join(&self, kind: JoinKind, item: FromItem, on: impl Into<Expression>) -> Self {
        self.with_node(self.node.with_join(JoinNode {
            kind,
            item,
            on: on.into(),
        }))
    }

    pub fn group_by(&self, references: &[&str]) -> Self {
        self.with_node(
            self.node.with_group_by(
                references
                    .iter()
                    .map(|reference| parse_reference(reference))
                    .collect(),
            ),
        )
    }

    /// Combined with `AND` on repeated calls
    pub fn having(&self, predicate: impl Into<Expression>) -> Self {
        self.with_node(self.node.with_having(predicate.into()))
    }

    pub fn order_by(&self, reference: &str, ordering: Option<Ordering>) -> Self {
        self.with_node(self.node.with_order_by(OrderByItemNode {
            expression: parse_reference(reference),
            ordering,
        }))
    }

    /// Replaces an earlier limit
    pub fn limit(&self, limit: i64) -> Self {
        self.with_node(self.node.with_limit(Expression::value(limit)))
    }

    /// Replaces an earlier offset
    pub fn offset(&self, offset: i64) -> Self {
        self.with_node(self.node.with_offset(Expression::value(offset)))
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

    /// This query as an aliased subquery, for a selection list
    pub fn as_(&self, alias: &str) -> Expression {
        Expression::SelectQuery(self.node.clone()).alias(alias)
    }

    /// This query as a `FROM` item: `(SELECT ...) AS "<alias>"`
    pub fn as_from_item(&self, alias: &str) -> FromItem {
        FromItem::Subquery {
            query: self.node.clone(),
            alias: alias.to_owned(),
        }
    }

    fn join_on(&self, kind: JoinKind, table: &str, lhs: &str, rhs: &str) -> Self {
        self.join(
            kind,
            parse_from_item(table),
            Expression::binary(
                parse_reference(lhs),
                BinaryOperator::Eq,
                parse_reference(rhs),
            ),
        )
    }

    fn with_node(&self, node: SelectQueryNode) -> Self {
        Self {
            node: Arc::new(node),
            ..self.clone()
        }
    }
}

impl From<SelectQueryBuilder> for Expression {
    fn from(builder: SelectQueryBuilder) -> Self {
        Expression::SelectQuery(builder.node)
    }
}

impl WhereInterface for SelectQueryBuilder {
    fn where_expr(&self, predicate: impl Into<Expression>) -> Self {
        self.with_node(self.node.with_where(predicate.into()))
    }
}

impl Conditional for SelectQueryBuilder {}

impl Executable for SelectQueryBuilder {
    type Output = Row;

    fn query_id(&self) -> &QueryId {
        &self.query_id
    }

    fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    fn to_operation_node(&self) -> QueryNode {
        QueryNode::Select(self.node.clone())
    }

    fn shape_result(&self, _node: &QueryNode, result: QueryResult) -> Vec<Row> {
        result.rows
    }
}
