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
    clause::ExplainNode,
    expression::Expression,
    table::{FromItem, JoinNode},
    update::and_where,
};

/// A select statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQueryNode {
    pub from: Arc<[FromItem]>,
    /// The selected expressions. Empty renders as `*`.
    pub selections: Arc<[Expression]>,
    pub distinct: bool,
    pub joins: Arc<[JoinNode]>,
    pub where_: Option<Expression>,
    pub group_by: Arc<[Expression]>,
    pub having: Option<Expression>,
    pub order_by: Arc<[OrderByItemNode]>,
    pub limit: Option<Expression>,
    pub offset: Option<Expression>,
    pub explain: Option<ExplainNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItemNode {
    pub expression: Expression,
    pub ordering: Option<Ordering>,
}

impl SelectQueryNode {
    pub fn new(from: Vec<FromItem>) -> Self {
        Self {
            from: from.into(),
            selections: Arc::new([]),
            distinct: false,
            joins: Arc::new([]),
            where_: None,
            group_by: Arc::new([]),
            having: None,
            order_by: Arc::new([]),
            limit: None,
            offset: None,
            explain: None,
        }
    }

    pub fn with_selections(&self, selections: Vec<Expression>) -> Self {
        Self {
            selections: append(&self.selections, selections),
            ..self.clone()
        }
    }

    pub fn with_distinct(&self, distinct: bool) -> Self {
        Self {
            distinct,
            ..self.clone()
        }
    }

    pub fn with_join(&self, join: JoinNode) -> Self {
        Self {
            joins: append(&self.joins, vec![join]),
            ..self.clone()
        }
    }

    pub fn with_where(&self, predicate: Expression) -> Self {
        Self {
            where_: Some(and_where(self.where_.as_ref(), predicate)),
            ..self.clone()
        }
    }

    pub fn with_group_by(&self, expressions: Vec<Expression>) -> Self {
        Self {
            group_by: append(&self.group_by, expressions),
            ..self.clone()
        }
    }

    pub fn with_having(&self, predicate: Expression) -> Self {
        Self {
            having: Some(and_where(self.having.as_ref(), predicate)),
            ..self.clone()
        }
    }

    pub fn with_order_by(&self, item: OrderByItemNode) -> Self {
        Self {
            order_by: append(&self.order_by, vec![item]),
            ..self.clone()
        }
    }

    pub fn with_limit(&self, limit: Expression) -> Self {
        Self {
            limit: Some(limit),
            ..self.clone()
        }
    }

    pub fn with_offset(&self, offset: Expression) -> Self {
        Self {
            offset: Some(offset),
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

fn append<T: Clone>(existing: &Arc<[T]>, items: Vec<T>) -> Arc<[T]> {
    existing.iter().cloned().chain(items).collect()
}
