// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{
    clause::{ExplainNode, ReturningNode},
    expression::Expression,
    table::TableNode,
    update::and_where,
};

/// A delete statement: `DELETE FROM <table> WHERE <predicate> RETURNING <selections>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQueryNode {
    pub from: TableNode,
    pub where_: Option<Expression>,
    pub returning: Option<ReturningNode>,
    pub explain: Option<ExplainNode>,
}

impl DeleteQueryNode {
    pub fn new(from: TableNode) -> Self {
        Self {
            from,
            where_: None,
            returning: None,
            explain: None,
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
