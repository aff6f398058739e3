// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Parsing of the string shorthands builders accept for tables, columns and selections.

use crate::node::{ColumnNode, Expression, FromItem, TableNode};

/// `"person"` or `"public.person"`
pub fn parse_table(table: &str) -> TableNode {
    match table.trim().split_once('.') {
        Some((schema, name)) => TableNode::new(name.trim()).with_schema(schema.trim()),
        None => TableNode::new(table.trim()),
    }
}

/// `"person"` or `"person as p"` (also with a schema)
pub fn parse_from_item(from: &str) -> FromItem {
    let (table, alias) = split_alias(from);
    FromItem::table(parse_table(table), alias.map(str::to_owned))
}

/// `"age"`, `"person.age"`, `"public.person.age"`, `"*"` or `"person.*"`
pub fn parse_reference(reference: &str) -> Expression {
    let reference = reference.trim();
    let (table, column) = match reference.rsplit_once('.') {
        Some((table, column)) => (Some(parse_table(table)), column.trim()),
        None => (None, reference),
    };

    if column == "*" {
        Expression::Star(table)
    } else {
        Expression::reference(table, column)
    }
}

/// A reference with an optional alias: `"first_name as name"`
pub fn parse_selection(selection: &str) -> Expression {
    let (reference, alias) = split_alias(selection);
    let expression = parse_reference(reference);
    match alias {
        Some(alias) => expression.alias(alias),
        None => expression,
    }
}

pub fn parse_column(column: &str) -> ColumnNode {
    ColumnNode::new(column.trim())
}

/// Split `"<expr> as <alias>"` (keyword matched case-insensitively) into its parts.
fn split_alias(input: &str) -> (&str, Option<&str>) {
    let input = input.trim();
    // ASCII lowercasing keeps byte offsets valid for `input`
    let lowercase = input.to_ascii_lowercase();
    match lowercase.rfind(" as ") {
        Some(index) => (input[..index].trim(), Some(input[index + 4..].trim())),
        None => (input, None),
    }
}
