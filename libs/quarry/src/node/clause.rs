// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use super::{expression::Expression, table::ColumnNode};

/// `RETURNING <selection>, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturningNode {
    pub selections: Arc<[Expression]>,
}

impl ReturningNode {
    pub fn new(selections: Vec<Expression>) -> Self {
        Self {
            selections: selections.into(),
        }
    }

    /// A new returning node with `selections` added after the existing ones. Repeated
    /// `returning` calls accumulate.
    pub fn append(existing: Option<&ReturningNode>, selections: Vec<Expression>) -> Self {
        match existing {
            Some(existing) => Self {
                selections: existing
                    .selections
                    .iter()
                    .cloned()
                    .chain(selections)
                    .collect(),
            },
            None => Self::new(selections),
        }
    }
}

/// `EXPLAIN [<options>] [FORMAT ...] <query>`
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainNode {
    pub format: Option<String>,
    pub options: Option<Expression>,
}

/// `"column" = <value>` as used by `UPDATE ... SET`, `ON CONFLICT ... DO UPDATE SET` and
/// `ON DUPLICATE KEY UPDATE`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnUpdateNode {
    pub column: ColumnNode,
    pub value: Expression,
}

impl ColumnUpdateNode {
    pub fn new(column: ColumnNode, value: Expression) -> Self {
        Self { column, value }
    }
}
