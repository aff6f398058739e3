// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Turn a [`QueryNode`] tree into SQL text and an ordered parameter list.
//!
//! Every node implements [`ExpressionBuilder`], which appends its own SQL to an [`SQLBuilder`].
//! Parameters are pushed at the moment their placeholder is written, so placeholder numbering and
//! the parameter list always agree, however deeply values are nested (raw fragments, subqueries,
//! conflict updates).

use std::sync::Arc;

use crate::{
    executor::QueryId,
    node::{QueryNode, Value},
    query_error::QueryError,
};

mod compiled_query;
pub mod dialect;
mod expression;
mod mutation;
mod select;
mod sql_builder;

pub use compiled_query::CompiledQuery;
pub use dialect::{Dialect, MysqlDialect, PostgresDialect, SqliteDialect};
pub use sql_builder::SQLBuilder;

/// A trait for types that can build themselves into an SQL expression.
///
/// Each constituent of a query (reference, value, clause, whole statement) implements this trait,
/// which is then used to hierarchically build the SQL string and the list of parameters to be
/// supplied to it.
pub trait ExpressionBuilder {
    /// Build the SQL expression into the given SQL builder
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError>;

    /// Build the SQL expression into a string and return it along with its parameters. Mostly
    /// useful in tests, where we want to assert on the generated SQL of a fragment.
    fn to_sql(&self, dialect: &dyn Dialect) -> Result<(String, Vec<Value>), QueryError>
    where
        Self: Sized,
    {
        let mut builder = SQLBuilder::new(dialect);
        self.build(&mut builder)?;
        Ok(builder.into_sql())
    }
}

impl<T> ExpressionBuilder for Box<T>
where
    T: ExpressionBuilder,
{
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        self.as_ref().build(builder)
    }
}

impl<T> ExpressionBuilder for Arc<T>
where
    T: ExpressionBuilder,
{
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        self.as_ref().build(builder)
    }
}

impl<T> ExpressionBuilder for &T
where
    T: ExpressionBuilder,
{
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        (**self).build(builder)
    }
}

impl ExpressionBuilder for QueryNode {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        match self {
            QueryNode::Select(select) => select.build(builder),
            QueryNode::Insert(insert) => insert.build(builder),
            QueryNode::Update(update) => update.build(builder),
            QueryNode::Delete(delete) => delete.build(builder),
        }
    }
}

/// Compiles root query nodes for one dialect.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    dialect: Arc<dyn Dialect>,
}

impl QueryCompiler {
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Compile a root node. An `EXPLAIN` request on the root is rendered as a prefix; one on a
    /// nested select is ignored.
    pub fn compile(&self, query: QueryNode, query_id: QueryId) -> Result<CompiledQuery, QueryError> {
        let mut builder = SQLBuilder::new(self.dialect.as_ref());

        if let Some(explain) = query.explain() {
            explain.build(&mut builder)?;
        }
        query.build(&mut builder)?;

        let (sql, parameters) = builder.into_sql();
        Ok(CompiledQuery {
            sql,
            parameters,
            query,
            query_id,
        })
    }
}
