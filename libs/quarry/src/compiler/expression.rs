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
        BinaryOperationNode, BinaryOperator, ColumnNode, ColumnUpdateNode, ExplainNode, Expression,
        FromItem, JoinNode, NodeKind, OrderByItemNode, Ordering, RawNode, ReferenceNode,
        ReturningNode, UnaryOperationNode, Value,
    },
    query_error::QueryError,
};

use super::{ExpressionBuilder, SQLBuilder};

impl ExpressionBuilder for Expression {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        match self {
            Expression::Reference(reference) => reference.build(builder),
            Expression::Value(value) => {
                builder.require(NodeKind::Value)?;
                builder.push_param(value.clone());
                Ok(())
            }
            Expression::Raw(raw) => raw.build(builder),
            Expression::Binary(binary) => binary.build(builder),
            Expression::Unary(unary) => unary.build(builder),
            Expression::Function(function) => {
                builder.require(NodeKind::Function)?;
                builder.push_str(&function.name);
                builder.push('(');
                builder.push_elems(&function.arguments, ", ")?;
                builder.push(')');
                Ok(())
            }
            Expression::Alias(alias) => {
                builder.require(NodeKind::Alias)?;
                alias.expression.build(builder)?;
                builder.push_str(" AS ");
                builder.push_identifier(&alias.alias);
                Ok(())
            }
            Expression::List(items) => {
                builder.require(NodeKind::List)?;
                builder.push('(');
                builder.push_elems(items, ", ")?;
                builder.push(')');
                Ok(())
            }
            Expression::SelectQuery(select) => {
                builder.push('(');
                select.build(builder)?;
                builder.push(')');
                Ok(())
            }
            Expression::Star(table) => {
                if let Some(table) = table {
                    builder.push_table(table);
                    builder.push('.');
                }
                builder.push('*');
                Ok(())
            }
            Expression::DefaultInsertValue => {
                builder.require(NodeKind::DefaultInsertValue)?;
                let keyword = builder.dialect().default_insert_value();
                builder.push_str(keyword);
                Ok(())
            }
        }
    }
}

impl ExpressionBuilder for ReferenceNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::Reference)?;
        if let Some(table) = &self.table {
            builder.push_table(table);
            builder.push('.');
        }
        builder.push_identifier(&self.column.name);
        Ok(())
    }
}

impl ExpressionBuilder for ColumnNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.push_identifier(&self.name);
        Ok(())
    }
}

impl ExpressionBuilder for RawNode {
    /// Interleave the fragments with the parameters: `fragment[0] param[0] fragment[1] ...`. Each
    /// parameter is built in place, so nested values get their placeholders in textual order.
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::Raw)?;
        for (index, fragment) in self.sql_fragments.iter().enumerate() {
            builder.push_str(fragment);
            if let Some(parameter) = self.parameters.get(index) {
                parameter.build(builder)?;
            }
        }
        Ok(())
    }
}

impl ExpressionBuilder for BinaryOperationNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::BinaryOperation)?;

        // Operands of AND/OR always bind tighter, so only the other operators group their operands
        let logical = self.operator.is_logical();
        if logical {
            builder.push('(');
            self.left.build(builder)?;
        } else {
            build_operand(&self.left, builder)?;
        }
        builder.push_space();
        builder.push_str(self.operator.as_sql());
        builder.push_space();
        match (&self.operator, &self.right) {
            // `IS $1` with a NULL parameter is rejected by some databases
            (BinaryOperator::Is | BinaryOperator::IsNot, Expression::Value(Value::Null)) => {
                builder.push_str("NULL")
            }
            _ if logical => self.right.build(builder)?,
            _ => build_operand(&self.right, builder)?,
        }
        if logical {
            builder.push(')');
        }
        Ok(())
    }
}

impl ExpressionBuilder for UnaryOperationNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::UnaryOperation)?;
        builder.push_str(self.operator.as_sql());
        build_operand(&self.operand, builder)
    }
}

/// Build an operand, parenthesizing a nested operation so the tree's grouping survives operator
/// precedence. Logical operations already carry their own parentheses.
fn build_operand(operand: &Expression, builder: &mut SQLBuilder) -> Result<(), QueryError> {
    match operand {
        Expression::Binary(node) if !node.operator.is_logical() => {
            builder.push('(');
            node.build(builder)?;
            builder.push(')');
            Ok(())
        }
        _ => operand.build(builder),
    }
}

impl ExpressionBuilder for ColumnUpdateNode {
    /// `"column" = <value>`. The column is never table-qualified.
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        self.column.build(builder)?;
        builder.push_str(" = ");
        self.value.build(builder)
    }
}

impl ExpressionBuilder for ReturningNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::Returning)?;
        builder.push_str(" RETURNING ");
        builder.push_elems(&self.selections, ", ")
    }
}

impl ExpressionBuilder for ExplainNode {
    /// The `EXPLAIN ` prefix, including the trailing space before the statement.
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::Explain)?;
        builder.push_str("EXPLAIN ");
        if let Some(options) = &self.options {
            options.build(builder)?;
            builder.push_space();
        }
        if let Some(format) = &self.format {
            let format = builder.dialect().explain_format(format);
            builder.push_str(format);
            builder.push_space();
        }
        Ok(())
    }
}

impl ExpressionBuilder for FromItem {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        match self {
            FromItem::Table { table, alias } => {
                builder.require(NodeKind::Table)?;
                builder.push_table(table);
                if let Some(alias) = alias {
                    builder.push_str(" AS ");
                    builder.push_identifier(alias);
                }
            }
            FromItem::Subquery { query, alias } => {
                builder.push('(');
                query.build(builder)?;
                builder.push_str(") AS ");
                builder.push_identifier(alias);
            }
        }
        Ok(())
    }
}

impl ExpressionBuilder for JoinNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::Join)?;
        builder.push_str(self.kind.as_sql());
        builder.push_space();
        self.item.build(builder)?;
        builder.push_str(" ON ");
        self.on.build(builder)
    }
}

impl ExpressionBuilder for OrderByItemNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::OrderBy)?;
        self.expression.build(builder)?;
        match self.ordering {
            Some(Ordering::Asc) => builder.push_str(" ASC"),
            Some(Ordering::Desc) => builder.push_str(" DESC"),
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        compiler::dialect::{MysqlDialect, PostgresDialect},
        node::{TableNode, UnaryOperator},
    };

    use super::*;

    fn age() -> Expression {
        Expression::reference(Some(TableNode::new("people")), "age")
    }

    #[test]
    fn eq_expression() {
        let predicate = Expression::binary(age(), BinaryOperator::Eq, Expression::value(5));

        assert_binding!(
            predicate.to_sql(&PostgresDialect).unwrap(),
            r#""people"."age" = $1"#,
            5
        );
        assert_binding!(
            predicate.to_sql(&MysqlDialect).unwrap(),
            "`people`.`age` = ?",
            5
        );
    }

    #[test]
    fn and_expression() {
        let name = Expression::reference(None, "name");
        let predicate = Expression::binary(name, BinaryOperator::Eq, Expression::value("foo"))
            .and(Expression::binary(
                age(),
                BinaryOperator::Gt,
                Expression::value(5),
            ));

        assert_binding!(
            predicate.to_sql(&PostgresDialect).unwrap(),
            r#"("name" = $1 AND "people"."age" > $2)"#,
            "foo",
            5
        );
    }

    #[test]
    fn is_null_is_inlined() {
        let predicate = Expression::binary(age(), BinaryOperator::Is, Expression::Value(Value::Null));

        assert_binding!(
            predicate.to_sql(&PostgresDialect).unwrap(),
            r#""people"."age" IS NULL"#
        );
    }

    #[test]
    fn raw_with_nested_parameters() {
        let raw = Expression::Raw(Arc::new(RawNode {
            sql_fragments: vec!["concat(".into(), ", ".into(), ")".into()],
            parameters: vec![Expression::value("a"), Expression::reference(None, "b")],
        }));

        assert_binding!(
            raw.to_sql(&PostgresDialect).unwrap(),
            r#"concat($1, "b")"#,
            "a"
        );
    }

    #[test]
    fn function_alias_and_list() {
        let lower = Expression::function("lower", vec![Expression::reference(None, "name")])
            .alias("lower_name");
        assert_binding!(
            lower.to_sql(&PostgresDialect).unwrap(),
            r#"lower("name") AS "lower_name""#
        );

        let in_list = Expression::binary(
            age(),
            BinaryOperator::In,
            Expression::list(vec![Expression::value(1), Expression::value(2)]),
        );
        assert_binding!(
            in_list.to_sql(&PostgresDialect).unwrap(),
            r#""people"."age" IN ($1, $2)"#,
            1,
            2
        );

        let negated = Expression::unary(UnaryOperator::Not, in_list);
        assert_binding!(
            negated.to_sql(&PostgresDialect).unwrap(),
            r#"NOT ("people"."age" IN ($1, $2))"#,
            1,
            2
        );
    }

    #[test]
    fn nested_operations_keep_their_grouping() {
        let a = Expression::reference(None, "a");
        let b = Expression::reference(None, "b");
        let c = Expression::reference(None, "c");
        let sum = Expression::binary(a, BinaryOperator::Add, b);

        let product = Expression::binary(sum.clone(), BinaryOperator::Mul, c.clone());
        assert_binding!(
            product.to_sql(&PostgresDialect).unwrap(),
            r#"("a" + "b") * "c""#
        );

        let negated = Expression::unary(UnaryOperator::Negate, sum.clone());
        assert_binding!(negated.to_sql(&PostgresDialect).unwrap(), r#"-("a" + "b")"#);

        let compared = Expression::binary(c, BinaryOperator::Gt, sum);
        assert_binding!(
            compared.to_sql(&MysqlDialect).unwrap(),
            "`c` > (`a` + `b`)"
        );
    }
}
