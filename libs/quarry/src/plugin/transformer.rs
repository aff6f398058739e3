// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::node::{
    AliasNode, BinaryOperationNode, ColumnNode, ColumnUpdateNode, ConflictAction, ConflictTarget,
    DeleteQueryNode, Expression, FromItem, FunctionNode, InsertQueryNode, InsertSource, JoinNode,
    OnConflictNode, OnDuplicateKeyNode, OrderByItemNode, QueryNode, RawNode, ReferenceNode,
    ReturningNode, SelectQueryNode, TableNode, UnaryOperationNode, UpdateQueryNode, ValuesNode,
};

/// Rebuild a query tree, node by node.
///
/// Every method has a default that rebuilds its node from the transformed children, so an
/// implementation overrides only the nodes it cares about. The leaves most plugins need are
/// [`transform_table`](Self::transform_table) (tables a statement reads or writes),
/// [`transform_reference_table`](Self::transform_reference_table) (a table qualifier inside a
/// column reference, possibly an alias) and [`transform_identifier`](Self::transform_identifier).
pub trait OperationNodeTransformer {
    fn transform_query(&self, node: QueryNode) -> QueryNode {
        match node {
            QueryNode::Select(select) => QueryNode::Select(Arc::new(self.transform_select(&select))),
            QueryNode::Insert(insert) => QueryNode::Insert(Arc::new(self.transform_insert(&insert))),
            QueryNode::Update(update) => QueryNode::Update(Arc::new(self.transform_update(&update))),
            QueryNode::Delete(delete) => QueryNode::Delete(Arc::new(self.transform_delete(&delete))),
        }
    }

    fn transform_select(&self, node: &SelectQueryNode) -> SelectQueryNode {
        SelectQueryNode {
            from: node
                .from
                .iter()
                .map(|item| self.transform_from_item(item))
                .collect(),
            selections: self.transform_expressions(&node.selections),
            distinct: node.distinct,
            joins: node
                .joins
                .iter()
                .map(|join| self.transform_join(join))
                .collect(),
            where_: self.transform_optional(node.where_.as_ref()),
            group_by: self.transform_expressions(&node.group_by),
            having: self.transform_optional(node.having.as_ref()),
            order_by: node
                .order_by
                .iter()
                .map(|item| self.transform_order_by_item(item))
                .collect(),
            limit: self.transform_optional(node.limit.as_ref()),
            offset: self.transform_optional(node.offset.as_ref()),
            explain: node.explain.clone(),
        }
    }

    fn transform_insert(&self, node: &InsertQueryNode) -> InsertQueryNode {
        InsertQueryNode {
            into: self.transform_table(&node.into),
            columns: node.columns.as_ref().map(|columns| {
                columns
                    .iter()
                    .map(|column| self.transform_column(column))
                    .collect()
            }),
            values: node.values.as_ref().map(|values| match values {
                InsertSource::Values(values) => InsertSource::Values(Arc::new(ValuesNode {
                    rows: values
                        .rows
                        .iter()
                        .map(|row| self.transform_expressions(row))
                        .collect(),
                })),
                InsertSource::Expression(expression) => {
                    InsertSource::Expression(self.transform_expression(expression))
                }
                InsertSource::DefaultValues => InsertSource::DefaultValues,
            }),
            ignore: node.ignore,
            replace: node.replace,
            on_conflict: node
                .on_conflict
                .as_ref()
                .map(|on_conflict| Arc::new(self.transform_on_conflict(on_conflict))),
            on_duplicate_key: node.on_duplicate_key.as_ref().map(|on_duplicate_key| {
                Arc::new(OnDuplicateKeyNode {
                    updates: self.transform_column_updates(&on_duplicate_key.updates),
                })
            }),
            returning: node
                .returning
                .as_ref()
                .map(|returning| self.transform_returning(returning)),
            explain: node.explain.clone(),
        }
    }

    fn transform_update(&self, node: &UpdateQueryNode) -> UpdateQueryNode {
        UpdateQueryNode {
            table: self.transform_table(&node.table),
            updates: self.transform_column_updates(&node.updates),
            where_: self.transform_optional(node.where_.as_ref()),
            returning: node
                .returning
                .as_ref()
                .map(|returning| self.transform_returning(returning)),
            explain: node.explain.clone(),
        }
    }

    fn transform_delete(&self, node: &DeleteQueryNode) -> DeleteQueryNode {
        DeleteQueryNode {
            from: self.transform_table(&node.from),
            where_: self.transform_optional(node.where_.as_ref()),
            returning: node
                .returning
                .as_ref()
                .map(|returning| self.transform_returning(returning)),
            explain: node.explain.clone(),
        }
    }

    fn transform_from_item(&self, item: &FromItem) -> FromItem {
        match item {
            FromItem::Table { table, alias } => FromItem::Table {
                table: self.transform_table(table),
                alias: alias.as_ref().map(|alias| self.transform_identifier(alias)),
            },
            FromItem::Subquery { query, alias } => FromItem::Subquery {
                query: Arc::new(self.transform_select(query)),
                alias: self.transform_identifier(alias),
            },
        }
    }

    fn transform_join(&self, join: &JoinNode) -> JoinNode {
        JoinNode {
            kind: join.kind,
            item: self.transform_from_item(&join.item),
            on: self.transform_expression(&join.on),
        }
    }

    fn transform_order_by_item(&self, item: &OrderByItemNode) -> OrderByItemNode {
        OrderByItemNode {
            expression: self.transform_expression(&item.expression),
            ordering: item.ordering,
        }
    }

    fn transform_on_conflict(&self, node: &OnConflictNode) -> OnConflictNode {
        let target = match &node.target {
            ConflictTarget::Unspecified => ConflictTarget::Unspecified,
            ConflictTarget::Columns(columns) => ConflictTarget::Columns(
                columns
                    .iter()
                    .map(|column| self.transform_column(column))
                    .collect(),
            ),
            ConflictTarget::Constraint(name) => {
                ConflictTarget::Constraint(self.transform_identifier(name))
            }
            ConflictTarget::Expression(expression) => {
                ConflictTarget::Expression(self.transform_expression(expression))
            }
        };
        let action = match &node.action {
            ConflictAction::DoNothing => ConflictAction::DoNothing,
            ConflictAction::DoUpdate { updates, where_ } => ConflictAction::DoUpdate {
                updates: self.transform_column_updates(updates),
                where_: self.transform_optional(where_.as_ref()),
            },
        };

        OnConflictNode {
            target,
            index_where: self.transform_optional(node.index_where.as_ref()),
            action,
        }
    }

    fn transform_column_updates(&self, updates: &[ColumnUpdateNode]) -> Arc<[ColumnUpdateNode]> {
        updates
            .iter()
            .map(|update| ColumnUpdateNode {
                column: self.transform_column(&update.column),
                value: self.transform_expression(&update.value),
            })
            .collect()
    }

    fn transform_returning(&self, node: &ReturningNode) -> ReturningNode {
        ReturningNode {
            selections: self.transform_expressions(&node.selections),
        }
    }

    fn transform_expression(&self, expression: &Expression) -> Expression {
        match expression {
            Expression::Reference(reference) => {
                Expression::Reference(self.transform_reference(reference))
            }
            Expression::Value(_) | Expression::DefaultInsertValue => expression.clone(),
            // Raw SQL text is opaque; only its parameters are visited
            Expression::Raw(raw) => Expression::Raw(Arc::new(RawNode {
                sql_fragments: raw.sql_fragments.clone(),
                parameters: raw
                    .parameters
                    .iter()
                    .map(|parameter| self.transform_expression(parameter))
                    .collect(),
            })),
            Expression::Binary(binary) => Expression::Binary(Arc::new(BinaryOperationNode {
                left: self.transform_expression(&binary.left),
                operator: binary.operator,
                right: self.transform_expression(&binary.right),
            })),
            Expression::Unary(unary) => Expression::Unary(Arc::new(UnaryOperationNode {
                operator: unary.operator,
                operand: self.transform_expression(&unary.operand),
            })),
            Expression::Function(function) => Expression::Function(Arc::new(FunctionNode {
                name: function.name.clone(),
                arguments: self.transform_expressions(&function.arguments),
            })),
            Expression::Alias(alias) => Expression::Alias(Arc::new(AliasNode {
                expression: self.transform_expression(&alias.expression),
                alias: self.transform_identifier(&alias.alias),
            })),
            Expression::List(items) => Expression::List(self.transform_expressions(items)),
            Expression::SelectQuery(select) => {
                Expression::SelectQuery(Arc::new(self.transform_select(select)))
            }
            Expression::Star(table) => Expression::Star(
                table
                    .as_ref()
                    .map(|table| self.transform_reference_table(table)),
            ),
        }
    }

    fn transform_expressions(&self, expressions: &[Expression]) -> Arc<[Expression]> {
        expressions
            .iter()
            .map(|expression| self.transform_expression(expression))
            .collect()
    }

    fn transform_optional(&self, expression: Option<&Expression>) -> Option<Expression> {
        expression.map(|expression| self.transform_expression(expression))
    }

    fn transform_reference(&self, reference: &ReferenceNode) -> ReferenceNode {
        ReferenceNode {
            table: reference
                .table
                .as_ref()
                .map(|table| self.transform_reference_table(table)),
            column: self.transform_column(&reference.column),
        }
    }

    /// A table that a statement reads from or writes to
    fn transform_table(&self, table: &TableNode) -> TableNode {
        self.transform_reference_table(table)
    }

    /// A table qualifier of a column reference, which may name an alias rather than a table
    fn transform_reference_table(&self, table: &TableNode) -> TableNode {
        TableNode {
            schema: table
                .schema
                .as_ref()
                .map(|schema| self.transform_identifier(schema)),
            name: self.transform_identifier(&table.name),
        }
    }

    fn transform_column(&self, column: &ColumnNode) -> ColumnNode {
        ColumnNode::new(self.transform_identifier(&column.name))
    }

    fn transform_identifier(&self, identifier: &str) -> String {
        identifier.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{BinaryOperator, SelectQueryNode};

    use super::*;

    struct Identity;
    impl OperationNodeTransformer for Identity {}

    struct Upper;
    impl OperationNodeTransformer for Upper {
        fn transform_identifier(&self, identifier: &str) -> String {
            identifier.to_uppercase()
        }
    }

    fn select() -> QueryNode {
        SelectQueryNode::new(vec![FromItem::table(TableNode::new("person"), Some("p".into()))])
            .with_selections(vec![
                Expression::reference(Some(TableNode::new("p")), "name").alias("n"),
            ])
            .with_where(Expression::binary(
                Expression::reference(None, "age"),
                BinaryOperator::Gt,
                Expression::value(3),
            ))
            .into()
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Identity.transform_query(select()), select());
    }

    #[test]
    fn identifiers_are_rewritten_everywhere() {
        let expected: QueryNode =
            SelectQueryNode::new(vec![FromItem::table(TableNode::new("PERSON"), Some("P".into()))])
                .with_selections(vec![
                    Expression::reference(Some(TableNode::new("P")), "NAME").alias("N"),
                ])
                .with_where(Expression::binary(
                    Expression::reference(None, "AGE"),
                    BinaryOperator::Gt,
                    Expression::value(3),
                ))
                .into();

        assert_eq!(Upper.transform_query(select()), expected);
    }
}
