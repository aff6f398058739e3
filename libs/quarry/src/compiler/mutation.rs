// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    node::{
        ConflictAction, ConflictTarget, DeleteQueryNode, Expression, InsertQueryNode, InsertSource,
        NodeKind, OnConflictNode, OnDuplicateKeyNode, UpdateQueryNode, ValuesNode,
    },
    query_error::QueryError,
};

use super::{ExpressionBuilder, SQLBuilder};

impl ExpressionBuilder for InsertQueryNode {
    /// Build the insert statement of the form `INSERT INTO <table> (<columns>) VALUES (<values>)
    /// [ON CONFLICT ...] [ON DUPLICATE KEY UPDATE ...] [RETURNING <returning-columns>]`.
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::InsertQuery)?;

        if self.replace {
            builder.require(NodeKind::Replace)?;
            builder.push_str("REPLACE");
        } else {
            builder.push_str("INSERT");
        }
        if self.ignore {
            builder.require(NodeKind::InsertIgnore)?;
            let keyword = builder.dialect().insert_ignore_keyword();
            builder.push_space();
            builder.push_str(keyword);
        }
        builder.push_str(" INTO ");
        builder.push_table(&self.into);

        let has_columns = self.columns.as_ref().is_some_and(|c| !c.is_empty());
        match &self.values {
            Some(InsertSource::Values(values)) if has_columns => {
                builder.push_str(" (");
                builder.push_elems(self.columns.as_deref().unwrap_or_default(), ", ")?;
                builder.push_str(") ");
                values.build(builder)?;
            }
            Some(InsertSource::Expression(source)) => {
                if has_columns {
                    builder.push_str(" (");
                    builder.push_elems(self.columns.as_deref().unwrap_or_default(), ", ")?;
                    builder.push(')');
                }
                builder.push_space();
                match source {
                    // insert-from-select takes a bare select (SQLite rejects the parenthesized form)
                    Expression::SelectQuery(select) => select.build(builder)?,
                    other => other.build(builder)?,
                }
            }
            None if has_columns => {
                return Err(QueryError::shape(format!(
                    "insert into table '{}' names columns but has no values",
                    self.into.name
                )));
            }
            // No columns provided (or explicitly requested): every column takes its default.
            _ => {
                builder.require(NodeKind::DefaultValues)?;
                builder.push_str(" DEFAULT VALUES");
            }
        }

        if let Some(on_conflict) = &self.on_conflict {
            on_conflict.build(builder)?;
        }
        if let Some(on_duplicate_key) = &self.on_duplicate_key {
            on_duplicate_key.build(builder)?;
        }
        if let Some(returning) = &self.returning {
            returning.build(builder)?;
        }
        Ok(())
    }
}

impl ExpressionBuilder for ValuesNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::Values)?;
        builder.push_str("VALUES (");
        builder.push_iter(self.rows.iter(), "), (", |builder, row| {
            builder.push_elems(row, ", ")
        })?;
        builder.push(')');
        Ok(())
    }
}

impl ExpressionBuilder for OnConflictNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::OnConflict)?;
        builder.push_str(" ON CONFLICT");

        match &self.target {
            ConflictTarget::Unspecified => {}
            ConflictTarget::Columns(columns) => {
                builder.push_str(" (");
                builder.push_elems(columns, ", ")?;
                builder.push(')');
            }
            ConflictTarget::Constraint(name) => {
                builder.push_str(" ON CONSTRAINT ");
                builder.push_identifier(name);
            }
            ConflictTarget::Expression(expression) => {
                builder.push_str(" (");
                expression.build(builder)?;
                builder.push(')');
            }
        }

        if let Some(index_where) = &self.index_where {
            builder.push_str(" WHERE ");
            index_where.build(builder)?;
        }

        match &self.action {
            ConflictAction::DoNothing => builder.push_str(" DO NOTHING"),
            ConflictAction::DoUpdate { updates, where_ } => {
                builder.push_str(" DO UPDATE SET ");
                builder.push_elems(updates, ", ")?;
                if let Some(where_) = where_ {
                    builder.push_str(" WHERE ");
                    where_.build(builder)?;
                }
            }
        }
        Ok(())
    }
}

impl ExpressionBuilder for OnDuplicateKeyNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::OnDuplicateKey)?;
        builder.push_str(" ON DUPLICATE KEY UPDATE ");
        builder.push_elems(&self.updates, ", ")
    }
}

impl ExpressionBuilder for UpdateQueryNode {
    /// Build the update statement of the form `UPDATE <table> SET <column> = <value>, ...
    /// [WHERE <predicate>] [RETURNING <returning-columns>]`.
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::UpdateQuery)?;
        if self.updates.is_empty() {
            return Err(QueryError::shape(format!(
                "update of table '{}' has no values to set",
                self.table.name
            )));
        }

        builder.push_str("UPDATE ");
        builder.push_table(&self.table);
        builder.push_str(" SET ");
        builder.push_elems(&self.updates, ", ")?;

        if let Some(where_) = &self.where_ {
            builder.push_str(" WHERE ");
            where_.build(builder)?;
        }
        if let Some(returning) = &self.returning {
            returning.build(builder)?;
        }
        Ok(())
    }
}

impl ExpressionBuilder for DeleteQueryNode {
    /// Build the delete statement of the form `DELETE FROM <table> [WHERE <predicate>]
    /// [RETURNING <returning-columns>]`.
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::DeleteQuery)?;
        builder.push_str("DELETE FROM ");
        builder.push_table(&self.from);

        if let Some(where_) = &self.where_ {
            builder.push_str(" WHERE ");
            where_.build(builder)?;
        }
        if let Some(returning) = &self.returning {
            returning.build(builder)?;
        }
        Ok(())
    }
}
