// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    node::{NodeKind, TableNode, Value},
    query_error::QueryError,
};

use super::{ExpressionBuilder, dialect::Dialect};

pub struct SQLBuilder<'d> {
    dialect: &'d dyn Dialect,
    /// The SQL being built with placeholders for each parameter
    sql: String,
    /// The list of parameters, in the order their placeholders appear in `sql`
    params: Vec<Value>,
}

impl<'d> SQLBuilder<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Fail with a capability error unless the active dialect can render `kind`.
    pub fn require(&self, kind: NodeKind) -> Result<(), QueryError> {
        if self.dialect.supports(kind) {
            Ok(())
        } else {
            Err(QueryError::Capability {
                dialect: self.dialect.name(),
                kind,
            })
        }
    }

    /// Push a string
    pub fn push_str<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push_str(s.as_ref());
    }

    /// Push a character
    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Push a space. This is a common operation, so it is provided as a separate method.
    pub fn push_space(&mut self) {
        self.sql.push(' ');
    }

    /// Push an identifier (table name, column name, alias) surrounded by the dialect's quote
    /// character. Without the quotes, identifiers with uppercase letters (or reserved words) would
    /// be misinterpreted.
    pub fn push_identifier<T: AsRef<str>>(&mut self, s: T) {
        let quote = self.dialect.identifier_quote();
        self.sql.push(quote);
        for c in s.as_ref().chars() {
            if c == quote {
                self.sql.push(quote);
            }
            self.sql.push(c);
        }
        self.sql.push(quote);
    }

    /// Push `"schema"."table"` or just `"table"`
    pub fn push_table(&mut self, table: &TableNode) {
        if let Some(schema) = &table.schema {
            self.push_identifier(schema);
            self.push('.');
        }
        self.push_identifier(&table.name);
    }

    /// Push a parameter, which will be replaced with a placeholder in the SQL string
    /// and the parameter will be added to the list of parameters.
    pub fn push_param(&mut self, param: Value) {
        self.params.push(param);
        self.dialect.push_placeholder(self.params.len(), &mut self.sql);
    }

    /// Push elements of an iterator, separated by `sep`. The `push_elem` function provides
    /// the flexibility to map the elements (compared to [`SQLBuilder::push_elems`], which assumes that
    /// the elements implement [`ExpressionBuilder`] and [`build`](ExpressionBuilder::build) is all you need to call).
    pub fn push_iter<T>(
        &mut self,
        iter: impl Iterator<Item = T>,
        sep: &str,
        push_elem: impl Fn(&mut Self, T) -> Result<(), QueryError>,
    ) -> Result<(), QueryError> {
        for (i, item) in iter.enumerate() {
            if i > 0 {
                self.sql.push_str(sep);
            }
            push_elem(self, item)?;
        }
        Ok(())
    }

    /// Push elements of a slice, separated by `sep`. The elements must themselves implement
    /// `ExpressionBuilder`. This is a convenience method that encodes the common pattern of
    /// building a list of expressions and separating them by a separator.
    pub fn push_elems<T: ExpressionBuilder>(
        &mut self,
        elems: &[T],
        sep: &str,
    ) -> Result<(), QueryError> {
        self.push_iter(elems.iter(), sep, |builder, elem| elem.build(builder))
    }

    /// Get the SQL string and the list of parameters. Calling this method should be the final step
    /// in building an SQL expression, and thus this builder consumes the `self`.
    pub fn into_sql(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

#[cfg(test)]
mod tests {
    use crate::compiler::dialect::{MysqlDialect, PostgresDialect};

    use super::*;

    #[test]
    fn identifier_quotes_are_escaped() {
        let mut builder = SQLBuilder::new(&PostgresDialect);
        builder.push_identifier(r#"we"ird"#);
        assert_eq!(builder.into_sql().0, r#""we""ird""#);

        let mut builder = SQLBuilder::new(&MysqlDialect);
        builder.push_identifier("a`b");
        assert_eq!(builder.into_sql().0, "`a``b`");
    }

    #[test]
    fn placeholders_follow_dialect() {
        let mut builder = SQLBuilder::new(&PostgresDialect);
        builder.push_param(Value::Int(1));
        builder.push_str(", ");
        builder.push_param(Value::Int(2));
        assert_eq!(
            builder.into_sql(),
            ("$1, $2".to_owned(), vec![Value::Int(1), Value::Int(2)])
        );

        let mut builder = SQLBuilder::new(&MysqlDialect);
        builder.push_param(Value::Int(1));
        builder.push_param(Value::Int(2));
        assert_eq!(builder.into_sql().0, "??");
    }
}
