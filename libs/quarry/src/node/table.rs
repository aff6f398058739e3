// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use super::{expression::Expression, select::SelectQueryNode};

/// A table name, optionally qualified by a schema such as `"auth"."users"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableNode {
    pub schema: Option<String>,
    pub name: String,
}

impl TableNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn with_schema(&self, schema: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: self.name.clone(),
        }
    }
}

/// A bare column name as used in the column list of an insert or the left side of an update's
/// `SET` clause (where qualifying it with the table name is not allowed).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnNode {
    pub name: String,
}

impl ColumnNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Something that can appear in a `FROM` or `JOIN` position.
#[derive(Debug, Clone, PartialEq)]
pub enum FromItem {
    /// `"person"` or `"person" AS "p"`
    Table {
        table: TableNode,
        alias: Option<String>,
    },
    /// `(SELECT ...) AS "alias"`. Postgres requires the alias, so it is mandatory here.
    Subquery {
        query: Arc<SelectQueryNode>,
        alias: String,
    },
}

impl FromItem {
    pub fn table(table: TableNode, alias: Option<String>) -> Self {
        FromItem::Table { table, alias }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinNode {
    pub kind: JoinKind,
    pub item: FromItem,
    pub on: Expression,
}
