// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    node::{ColumnNode, Expression, InsertSource, ValuesNode},
    query_error::QueryError,
};

use super::reference::parse_column;

/// One row to insert (or one set of column updates): column names mapped to values or
/// expressions, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertObject(IndexMap<String, Expression>);

/// The same shape serves `UPDATE ... SET` and conflict updates
pub type UpdateObject = InsertObject;

impl InsertObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column`, replacing any earlier value while keeping its position. Surrounding
    /// whitespace in the column name is ignored.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expression>) -> Self {
        let column: String = column.into();
        let column = if column.trim().len() == column.len() {
            column
        } else {
            column.trim().to_owned()
        };
        self.0.insert(column, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn get(&self, column: &str) -> Option<&Expression> {
        self.0.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expression)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Expression>, const N: usize> From<[(K, V); N]> for InsertObject {
    fn from(entries: [(K, V); N]) -> Self {
        entries
            .into_iter()
            .fold(InsertObject::new(), |object, (k, v)| object.set(k, v))
    }
}

impl<K: Into<String>, V: Into<Expression>> FromIterator<(K, V)> for InsertObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(InsertObject::new(), |object, (k, v)| object.set(k, v))
    }
}

/// What `values` accepts: one row or a list of rows.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValues {
    Single(InsertObject),
    Multiple(Vec<InsertObject>),
}

impl From<InsertObject> for InsertValues {
    fn from(object: InsertObject) -> Self {
        InsertValues::Single(object)
    }
}

impl From<Vec<InsertObject>> for InsertValues {
    fn from(objects: Vec<InsertObject>) -> Self {
        InsertValues::Multiple(objects)
    }
}

impl<const N: usize> From<[InsertObject; N]> for InsertValues {
    fn from(objects: [InsertObject; N]) -> Self {
        InsertValues::Multiple(objects.into())
    }
}

/// Derive the column list and the values node for an insert.
///
/// Without explicit columns, a single row contributes exactly its keys; a list contributes the
/// union of its rows' keys in first-seen order. A row lacking one of the columns gets the
/// dialect's default-value marker in that position. With explicit columns (set by an earlier
/// `columns` call), every key of every row must be one of them.
pub fn parse_insert_values(
    values: InsertValues,
    explicit_columns: Option<&[ColumnNode]>,
) -> Result<(Arc<[ColumnNode]>, InsertSource), QueryError> {
    let rows = match values {
        InsertValues::Single(row) => vec![row],
        InsertValues::Multiple(rows) if rows.is_empty() => {
            return Err(QueryError::shape("insert values must contain at least one row"));
        }
        InsertValues::Multiple(rows) => rows,
    };

    let columns: Vec<ColumnNode> = match explicit_columns {
        Some(explicit) => {
            let unknown = rows
                .iter()
                .flat_map(|row| row.columns())
                .find(|key| !explicit.iter().any(|column| column.name == *key));
            if let Some(unknown) = unknown {
                return Err(QueryError::shape(format!(
                    "column '{unknown}' is not one of the insert's columns"
                )));
            }
            explicit.to_vec()
        }
        None => {
            let mut columns: Vec<ColumnNode> = vec![];
            for key in rows.iter().flat_map(|row| row.columns()) {
                if !columns.iter().any(|column| column.name == key) {
                    columns.push(parse_column(key));
                }
            }
            columns
        }
    };

    if columns.is_empty() {
        // Only empty rows: every column takes its default
        return Ok((Vec::new().into(), InsertSource::DefaultValues));
    }

    let rows: Vec<Arc<[Expression]>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    row.get(&column.name)
                        .cloned()
                        .unwrap_or(Expression::DefaultInsertValue)
                })
                .collect()
        })
        .collect();

    Ok((
        columns.into(),
        InsertSource::Values(Arc::new(ValuesNode { rows })),
    ))
}
