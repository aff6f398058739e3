// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::node::{Expression, RawNode, Value};

/// Raw SQL with embedded parameters.
///
/// ```ignore
/// let concat = raw("concat(").push_value("Ani").push_sql(", ").push_value("ston").push_sql(")");
/// ```
///
/// The SQL text is emitted verbatim; values (and nested expressions) are compiled in place, so
/// they get placeholders in the order they appear.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBuilder {
    sql_fragments: Vec<String>,
    parameters: Vec<Expression>,
}

pub fn raw(sql: impl Into<String>) -> RawBuilder {
    RawBuilder {
        sql_fragments: vec![sql.into()],
        parameters: vec![],
    }
}

impl RawBuilder {
    pub fn push_sql(mut self, sql: &str) -> Self {
        // Invariant: there is always one more fragment than there are parameters
        if let Some(last) = self.sql_fragments.last_mut() {
            last.push_str(sql);
        }
        self
    }

    pub fn push_value(self, value: impl Into<Value>) -> Self {
        self.push_expr(Expression::Value(value.into()))
    }

    pub fn push_expr(mut self, expression: impl Into<Expression>) -> Self {
        self.parameters.push(expression.into());
        self.sql_fragments.push(String::new());
        self
    }
}

impl From<RawBuilder> for Expression {
    fn from(builder: RawBuilder) -> Self {
        Expression::Raw(Arc::new(RawNode {
            sql_fragments: builder.sql_fragments,
            parameters: builder.parameters,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::compiler::{ExpressionBuilder, PostgresDialect};

    use super::*;

    #[test]
    fn interleaves_parameters() {
        let expression: Expression = raw("concat(")
            .push_value("Ani")
            .push_sql(", ")
            .push_expr(Expression::reference(None, "suffix"))
            .push_sql(")")
            .into();

        assert_binding!(
            expression.to_sql(&PostgresDialect).unwrap(),
            r#"concat($1, "suffix")"#,
            "Ani"
        );
    }

    #[test]
    fn plain_sql() {
        let expression: Expression = raw("'Ani' || 'ston'").into();

        assert_binding!(
            expression.to_sql(&PostgresDialect).unwrap(),
            "'Ani' || 'ston'"
        );
    }
}
