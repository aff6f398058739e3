// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    node::{NodeKind, SelectQueryNode},
    query_error::QueryError,
};

use super::{ExpressionBuilder, SQLBuilder};

impl ExpressionBuilder for SelectQueryNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.require(NodeKind::SelectQuery)?;
        builder.push_str("SELECT ");
        if self.distinct {
            builder.push_str("DISTINCT ");
        }

        if self.selections.is_empty() {
            builder.push('*');
        } else {
            builder.push_elems(&self.selections, ", ")?;
        }

        if !self.from.is_empty() {
            builder.push_str(" FROM ");
            builder.push_elems(&self.from, ", ")?;
        }

        for join in self.joins.iter() {
            builder.push_space();
            join.build(builder)?;
        }

        if let Some(where_) = &self.where_ {
            builder.push_str(" WHERE ");
            where_.build(builder)?;
        }

        if !self.group_by.is_empty() {
            builder.push_str(" GROUP BY ");
            builder.push_elems(&self.group_by, ", ")?;
        }

        if let Some(having) = &self.having {
            builder.push_str(" HAVING ");
            having.build(builder)?;
        }

        if !self.order_by.is_empty() {
            builder.push_str(" ORDER BY ");
            builder.push_elems(&self.order_by, ", ")?;
        }

        if let Some(limit) = &self.limit {
            builder.require(NodeKind::Limit)?;
            builder.push_str(" LIMIT ");
            limit.build(builder)?;
        }

        if let Some(offset) = &self.offset {
            builder.require(NodeKind::Offset)?;
            builder.push_str(" OFFSET ");
            offset.build(builder)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        compiler::dialect::{MysqlDialect, PostgresDialect},
        node::{
            BinaryOperator, Expression, FromItem, JoinKind, JoinNode, OrderByItemNode, Ordering,
            TableNode, UnaryOperator,
        },
    };

    use super::*;

    fn person() -> FromItem {
        FromItem::table(TableNode::new("person"), None)
    }

    #[test]
    fn star_select() {
        assert_binding!(
            SelectQueryNode::new(vec![person()])
                .to_sql(&PostgresDialect)
                .unwrap(),
            r#"SELECT * FROM "person""#
        );
    }

    #[test]
    fn select_with_all_clauses() {
        let pet = TableNode::new("pet");
        let select = SelectQueryNode::new(vec![FromItem::table(
            TableNode::new("person"),
            Some("p".into()),
        )])
        .with_distinct(true)
        .with_selections(vec![
            Expression::reference(Some(TableNode::new("p")), "first_name"),
            Expression::function("count", vec![Expression::reference(Some(pet.clone()), "id")])
                .alias("pet_count"),
        ])
        .with_join(JoinNode {
            kind: JoinKind::Left,
            item: FromItem::table(pet.clone(), None),
            on: Expression::binary(
                Expression::reference(Some(pet.clone()), "owner_id"),
                BinaryOperator::Eq,
                Expression::reference(Some(TableNode::new("p")), "id"),
            ),
        })
        .with_where(Expression::binary(
            Expression::reference(Some(TableNode::new("p")), "age"),
            BinaryOperator::Gte,
            Expression::value(18),
        ))
        .with_group_by(vec![Expression::reference(
            Some(TableNode::new("p")),
            "first_name",
        )])
        .with_having(Expression::binary(
            Expression::function("count", vec![Expression::reference(Some(pet), "id")]),
            BinaryOperator::Gt,
            Expression::value(1),
        ))
        .with_order_by(OrderByItemNode {
            expression: Expression::reference(None, "pet_count"),
            ordering: Some(Ordering::Desc),
        })
        .with_limit(Expression::value(10))
        .with_offset(Expression::value(20));

        assert_binding!(
            select.to_sql(&PostgresDialect).unwrap(),
            r#"SELECT DISTINCT "p"."first_name", count("pet"."id") AS "pet_count" FROM "person" AS "p" LEFT JOIN "pet" ON "pet"."owner_id" = "p"."id" WHERE "p"."age" >= $1 GROUP BY "p"."first_name" HAVING count("pet"."id") > $2 ORDER BY "pet_count" DESC LIMIT $3 OFFSET $4"#,
            18,
            1,
            10,
            20
        );
    }

    #[test]
    fn subqueries_number_parameters_in_textual_order() {
        let inner = SelectQueryNode::new(vec![FromItem::table(TableNode::new("pet"), None)])
            .with_selections(vec![Expression::reference(None, "owner_id")])
            .with_where(Expression::binary(
                Expression::reference(None, "species"),
                BinaryOperator::Eq,
                Expression::value("cat"),
            ));

        let select = SelectQueryNode::new(vec![person()])
            .with_where(Expression::binary(
                Expression::reference(None, "age"),
                BinaryOperator::Lt,
                Expression::value(40),
            ))
            .with_where(Expression::unary(
                UnaryOperator::Exists,
                Expression::SelectQuery(Arc::new(inner)),
            ));

        assert_binding!(
            select.to_sql(&MysqlDialect).unwrap(),
            "SELECT * FROM `person` WHERE (`age` < ? AND EXISTS (SELECT `owner_id` FROM `pet` WHERE `species` = ?))",
            40,
            "cat"
        );
    }
}
