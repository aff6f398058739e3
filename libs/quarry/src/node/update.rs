// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use super::{
    clause::{ColumnUpdateNode, ExplainNode, ReturningNode},
    expression::Expression,
    table::TableNode,
};

/// An update statement: `UPDATE <table> SET <updates> WHERE <predicate> RETURNING <selections>`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQueryNode {
    pub table: TableNode,
    pub updates: Arc<[ColumnUpdateNode]>,
    pub where_: Option<Expression>,
    pub returning: Option<ReturningNode>,
    pub explain: Option<ExplainNode>,
}

impl UpdateQueryNode {
    pub fn new(table: TableNode) -> Self {
        Self {
            table,
            updates: Arc::new([]),
            where_: None,
            returning: None,
            explain: None,
        }
    }

    /// Add updates after the existing ones (repeated `set` calls accumulate).
    pub fn with_updates(&self, updates: Arc<[ColumnUpdateNode]>) -> Self {
        Self {
            updates: self.updates.iter().chain(updates.iter()).cloned().collect(),
            ..self.clone()
        }
    }

    pub fn with_where(&self, predicate: Expression) -> Self {
        Self {
            where_: Some(and_where(self.where_.as_ref(), predicate)),
            ..self.clone()
        }
    }

    pub fn with_returning(&self, selections: Vec<Expression>) -> Self {
        Self {
            returning: Some(ReturningNode::append(self.returning.as_ref(), selections)),
            ..self.clone()
        }
    }

    pub fn with_explain(&self, explain: ExplainNode) -> Self {
        Self {
            explain: Some(explain),
            ..self.clone()
        }
    }
}

/// Repeated `where` calls are combined with `AND`
pub(crate) fn and_where(existing: Option<&Expression>, predicate: Expression) -> Expression {
    match existing {
        Some(existing) => existing.clone().and(predicate),
        None => predicate,
    }
}
