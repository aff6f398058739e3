// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Builders for `ON CONFLICT` clauses.
//!
//! [`OnConflictBuilder`] collects the target. Choosing the action (`do_nothing` or
//! `do_update_set`) moves to a builder that can be handed back to `InsertQueryBuilder::on_conflict`,
//! so a clause without an action cannot be attached.

use crate::{
    node::{BinaryOperator, ConflictAction, ConflictTarget, Expression, OnConflictNode},
    parser::{UpdateObject, parse_column, parse_reference, parse_update_object},
    query_error::QueryError,
};

use super::ExpressionFactory;

#[derive(Debug, Clone)]
pub struct OnConflictBuilder {
    node: OnConflictNode,
    expression_factory: ExpressionFactory,
}

impl OnConflictBuilder {
    pub(crate) fn new(expression_factory: ExpressionFactory) -> Self {
        Self {
            node: OnConflictNode::new(ConflictTarget::Unspecified),
            expression_factory,
        }
    }

    /// Add a column to the conflict target
    pub fn column(self, column: &str) -> Self {
        self.columns(&[column])
    }

    pub fn columns(self, columns: &[&str]) -> Self {
        let existing = match &self.node.target {
            ConflictTarget::Columns(existing) => existing.to_vec(),
            _ => vec![],
        };
        let target = ConflictTarget::Columns(
            existing
                .into_iter()
                .chain(columns.iter().map(|column| parse_column(column)))
                .collect(),
        );
        self.with_target(target)
    }

    /// `ON CONFLICT ON CONSTRAINT "<name>"`
    pub fn constraint(self, name: &str) -> Self {
        self.with_target(ConflictTarget::Constraint(name.to_owned()))
    }

    /// A target expression, for unique indexes over expressions
    pub fn expression(self, expression: impl Into<Expression>) -> Self {
        self.with_target(ConflictTarget::Expression(expression.into()))
    }

    /// Predicate of a partial unique index, combined with `AND` on repeated calls
    pub fn where_(
        self,
        reference: &str,
        operator: BinaryOperator,
        value: impl Into<Expression>,
    ) -> Self {
        let predicate = Expression::binary(parse_reference(reference), operator, value.into());
        self.where_expr(predicate)
    }

    pub fn where_expr(self, predicate: impl Into<Expression>) -> Self {
        Self {
            node: self.node.with_index_where(predicate.into()),
            ..self
        }
    }

    pub fn do_nothing(self) -> OnConflictDoNothingBuilder {
        OnConflictDoNothingBuilder {
            node: self.node.with_action(ConflictAction::DoNothing),
        }
    }

    pub fn do_update_set(
        self,
        updates: impl Into<UpdateObject>,
    ) -> Result<OnConflictUpdateBuilder, QueryError> {
        let updates = parse_update_object(updates.into())?;
        Ok(OnConflictUpdateBuilder {
            node: self.node.with_action(ConflictAction::DoUpdate {
                updates,
                where_: None,
            }),
        })
    }

    /// [`OnConflictBuilder::do_update_set`] with the update values built from expression helpers
    /// (`eb.ref_("excluded.age")`, for example)
    pub fn do_update_set_with(
        self,
        build: impl FnOnce(&ExpressionFactory) -> UpdateObject,
    ) -> Result<OnConflictUpdateBuilder, QueryError> {
        let updates = build(&self.expression_factory);
        self.do_update_set(updates)
    }

    fn with_target(self, target: ConflictTarget) -> Self {
        Self {
            node: self.node.with_target(target),
            ..self
        }
    }
}

#[derive(Debug, Clone)]
pub struct OnConflictDoNothingBuilder {
    node: OnConflictNode,
}

#[derive(Debug, Clone)]
pub struct OnConflictUpdateBuilder {
    node: OnConflictNode,
}

impl OnConflictUpdateBuilder {
    /// Only update when the predicate holds, combined with `AND` on repeated calls
    pub fn where_(
        self,
        reference: &str,
        operator: BinaryOperator,
        value: impl Into<Expression>,
    ) -> Self {
        let predicate = Expression::binary(parse_reference(reference), operator, value.into());
        self.where_expr(predicate)
    }

    pub fn where_expr(self, predicate: impl Into<Expression>) -> Self {
        let action = match &self.node.action {
            ConflictAction::DoUpdate { updates, where_ } => ConflictAction::DoUpdate {
                updates: updates.clone(),
                where_: Some(match where_ {
                    Some(existing) => existing.clone().and(predicate.into()),
                    None => predicate.into(),
                }),
            },
            ConflictAction::DoNothing => ConflictAction::DoNothing,
        };
        Self {
            node: self.node.with_action(action),
        }
    }
}

impl From<OnConflictDoNothingBuilder> for OnConflictNode {
    fn from(builder: OnConflictDoNothingBuilder) -> Self {
        builder.node
    }
}

impl From<OnConflictUpdateBuilder> for OnConflictNode {
    fn from(builder: OnConflictUpdateBuilder) -> Self {
        builder.node
    }
}
