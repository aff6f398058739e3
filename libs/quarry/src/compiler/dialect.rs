// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Debug;

use crate::node::NodeKind;

/// Rendering rules of a target database.
///
/// The compiler is dialect-agnostic; everything that differs between databases at the level the
/// compiler cares about (quoting, placeholders, and which constructs exist at all) is answered
/// here.
pub trait Dialect: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Character used to quote identifiers. An occurrence of it inside an identifier is escaped by
    /// doubling it.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Push the placeholder for the parameter at `index` (1-based).
    fn push_placeholder(&self, index: usize, sql: &mut String);

    /// What to render for a column missing from one of several inserted rows
    fn default_insert_value(&self) -> &'static str {
        "DEFAULT"
    }

    /// The keyword(s) placed between `INSERT` and `INTO` for an ignore-insert
    fn insert_ignore_keyword(&self) -> &'static str {
        "IGNORE"
    }

    /// The clause rendered after `EXPLAIN` for a requested output format
    fn explain_format(&self, format: &str) -> String {
        format!("FORMAT={format}")
    }

    fn supports(&self, kind: NodeKind) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn push_placeholder(&self, index: usize, sql: &mut String) {
        sql.push('$');
        sql.push_str(&index.to_string());
    }

    fn explain_format(&self, format: &str) -> String {
        format!("(FORMAT {})", format.to_uppercase())
    }

    fn supports(&self, kind: NodeKind) -> bool {
        !matches!(
            kind,
            NodeKind::OnDuplicateKey | NodeKind::InsertIgnore | NodeKind::Replace
        )
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlDialect;

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn push_placeholder(&self, _index: usize, sql: &mut String) {
        sql.push('?');
    }

    fn supports(&self, kind: NodeKind) -> bool {
        !matches!(kind, NodeKind::Returning | NodeKind::OnConflict)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn push_placeholder(&self, _index: usize, sql: &mut String) {
        sql.push('?');
    }

    // SQLite has no DEFAULT keyword inside a VALUES row
    fn default_insert_value(&self) -> &'static str {
        "NULL"
    }

    fn insert_ignore_keyword(&self) -> &'static str {
        "OR IGNORE"
    }

    fn explain_format(&self, _format: &str) -> String {
        "QUERY PLAN".to_owned()
    }

    fn supports(&self, kind: NodeKind) -> bool {
        !matches!(kind, NodeKind::OnDuplicateKey)
    }
}
