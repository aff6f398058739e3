// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    node::{BinaryOperator, Expression},
    parser::{parse_reference, parse_selection},
};

/// Builders whose statement takes a `WHERE` clause. Repeated calls are combined with `AND`.
pub trait WhereInterface: Sized {
    fn where_expr(&self, predicate: impl Into<Expression>) -> Self;

    /// `<reference> <operator> <value>`, where a plain value becomes a parameter
    fn where_(
        &self,
        reference: &str,
        operator: BinaryOperator,
        value: impl Into<Expression>,
    ) -> Self {
        self.where_expr(Expression::binary(
            parse_reference(reference),
            operator,
            value.into(),
        ))
    }

    /// Compare two references: `"pet"."owner_id" = "person"."id"`
    fn where_ref(&self, lhs: &str, operator: BinaryOperator, rhs: &str) -> Self {
        self.where_expr(Expression::binary(
            parse_reference(lhs),
            operator,
            parse_reference(rhs),
        ))
    }

    fn where_eq(&self, reference: &str, value: impl Into<Expression>) -> Self {
        self.where_(reference, BinaryOperator::Eq, value)
    }
}

/// Builders whose statement takes a `RETURNING` clause. Repeated calls accumulate.
pub trait ReturningInterface: Sized {
    fn returning_expressions(&self, selections: Vec<Expression>) -> Self;

    /// References with optional aliases: `["id", "first_name as name"]`
    fn returning(&self, selections: &[&str]) -> Self {
        self.returning_expressions(
            selections
                .iter()
                .map(|selection| parse_selection(selection))
                .collect(),
        )
    }

    fn returning_all(&self) -> Self {
        self.returning_expressions(vec![Expression::Star(None)])
    }
}

/// Conditionally extend a builder while keeping a single builder type.
pub trait Conditional: Clone {
    /// `transform(self)` if `condition` holds, otherwise an unchanged copy of `self`
    fn if_then(&self, condition: bool, transform: impl FnOnce(&Self) -> Self) -> Self {
        if condition {
            transform(self)
        } else {
            self.clone()
        }
    }
}
