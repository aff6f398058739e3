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
    clause::{ExplainNode, ReturningNode},
    expression::Expression,
    on_conflict::{OnConflictNode, OnDuplicateKeyNode},
    table::{ColumnNode, TableNode},
};

/// An insert statement.
///
/// All `with_*` methods return a new node that shares every unchanged field with `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQueryNode {
    /// The table to insert into.
    pub into: TableNode,
    /// The columns to insert into such as `(age, name)`. `None` until values or explicit columns
    /// have been supplied.
    pub columns: Option<Arc<[ColumnNode]>>,
    /// Where the inserted rows come from
    pub values: Option<InsertSource>,
    /// `INSERT IGNORE` (MySQL) / `INSERT OR IGNORE` (SQLite)
    pub ignore: bool,
    /// `REPLACE INTO` instead of `INSERT INTO`
    pub replace: bool,
    pub on_conflict: Option<Arc<OnConflictNode>>,
    pub on_duplicate_key: Option<Arc<OnDuplicateKeyNode>>,
    pub returning: Option<ReturningNode>,
    pub explain: Option<ExplainNode>,
}

/// The source of the rows of an insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// `VALUES (...), (...)`
    Values(Arc<ValuesNode>),
    /// An expression producing rows, typically `SELECT ...` (insert-from-select) or a raw fragment
    Expression(Expression),
    /// `DEFAULT VALUES`
    DefaultValues,
}

/// Value rows, each aligned with the insert's column list.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesNode {
    pub rows: Vec<Arc<[Expression]>>,
}

impl InsertQueryNode {
    pub fn new(into: TableNode) -> Self {
        Self {
            into,
            columns: None,
            values: None,
            ignore: false,
            replace: false,
            on_conflict: None,
            on_duplicate_key: None,
            returning: None,
            explain: None,
        }
    }

    pub fn with_columns(&self, columns: Arc<[ColumnNode]>) -> Self {
        Self {
            columns: Some(columns),
            ..self.clone()
        }
    }

    pub fn with_values(&self, columns: Arc<[ColumnNode]>, values: InsertSource) -> Self {
        Self {
            columns: Some(columns),
            values: Some(values),
            ..self.clone()
        }
    }

    pub fn with_source(&self, values: InsertSource) -> Self {
        Self {
            values: Some(values),
            ..self.clone()
        }
    }

    pub fn with_ignore(&self, ignore: bool) -> Self {
        Self {
            ignore,
            ..self.clone()
        }
    }

    pub fn with_replace(&self, replace: bool) -> Self {
        Self {
            replace,
            ..self.clone()
        }
    }

    pub fn with_on_conflict(&self, on_conflict: OnConflictNode) -> Self {
        Self {
            on_conflict: Some(Arc::new(on_conflict)),
            ..self.clone()
        }
    }

    pub fn with_on_duplicate_key(&self, on_duplicate_key: OnDuplicateKeyNode) -> Self {
        Self {
            on_duplicate_key: Some(Arc::new(on_duplicate_key)),
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
