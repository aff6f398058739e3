// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use super::{clause::ColumnUpdateNode, expression::Expression, table::ColumnNode};

/// `ON CONFLICT <target> [WHERE <index predicate>] DO <action>`
///
/// The action is a single field, so a conflict clause is either "do nothing" or "do update",
/// never a mix of both.
#[derive(Debug, Clone, PartialEq)]
pub struct OnConflictNode {
    pub target: ConflictTarget,
    /// Predicate for a partial unique index: `ON CONFLICT ("email") WHERE "deleted_at" IS NULL`
    pub index_where: Option<Expression>,
    pub action: ConflictAction,
}

impl OnConflictNode {
    pub fn new(target: ConflictTarget) -> Self {
        Self {
            target,
            index_where: None,
            action: ConflictAction::DoNothing,
        }
    }

    pub fn with_target(&self, target: ConflictTarget) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }

    pub fn with_index_where(&self, predicate: Expression) -> Self {
        let index_where = match &self.index_where {
            Some(existing) => existing.clone().and(predicate),
            None => predicate,
        };
        Self {
            index_where: Some(index_where),
            ..self.clone()
        }
    }

    pub fn with_action(&self, action: ConflictAction) -> Self {
        Self {
            action,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictTarget {
    /// No explicit target: `ON CONFLICT DO NOTHING`
    Unspecified,
    /// `ON CONFLICT ("a", "b")`
    Columns(Arc<[ColumnNode]>),
    /// `ON CONFLICT ON CONSTRAINT "name"`
    Constraint(String),
    /// `ON CONFLICT (<expression>)`, e.g. a functional unique index
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    DoNothing,
    DoUpdate {
        updates: Arc<[ColumnUpdateNode]>,
        where_: Option<Expression>,
    },
}

/// `ON DUPLICATE KEY UPDATE "a" = <value>, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct OnDuplicateKeyNode {
    pub updates: Arc<[ColumnUpdateNode]>,
}
