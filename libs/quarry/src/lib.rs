// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A type-directed SQL query builder.
//!
//! Queries are built through immutable builders obtained from a [QueryCreator]. Each builder
//! method returns a new builder holding a new operation-node tree ([node::QueryNode]); trees share
//! unchanged subtrees, so keeping old builders around is cheap. When a builder is executed, its
//! tree goes through the installed [plugin::QueryPlugin]s, is compiled to SQL text plus ordered
//! parameters by the [compiler::QueryCompiler] for the active [compiler::Dialect], and is handed
//! to a [executor::Driver].
//!
//! ```ignore
//! let db = QueryCreator::new(Arc::new(PostgresDialect), driver);
//! let person = db
//!     .insert_into("person")
//!     .values(InsertObject::from([("first_name", "Jennifer"), ("last_name", "Aniston")]))?
//!     .returning(&["id"])
//!     .execute_take_first_or_fail()
//!     .await?;
//! ```
//!
//! The crate doesn't talk to a database itself; drivers live in their own crates.

#[macro_use]
mod test_util;

pub mod compiler;
pub mod executor;
pub mod node;
pub mod parser;
pub mod plugin;
pub mod query_builder;
pub mod query_error;
pub mod row;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

/// Traits needed to call builder methods
pub mod prelude {
    pub use crate::plugin::{OperationNodeTransformer, QueryPlugin};
    pub use crate::query_builder::{
        Conditional, Executable, ReturningInterface, WhereInterface,
    };
}

pub use compiler::{CompiledQuery, Dialect, MysqlDialect, PostgresDialect, SqliteDialect};
pub use executor::{Driver, DriverError, QueryExecutor, QueryId, QueryResult};
pub use node::{BinaryOperator, Expression, JoinKind, Ordering, QueryNode, UnaryOperator, Value};
pub use parser::{InsertObject, InsertValues, UpdateObject, raw};
pub use plugin::{CamelCasePlugin, WithSchemaPlugin};
pub use query_builder::{
    DeleteQueryBuilder, ExpressionFactory, InsertQueryBuilder, MutationOutput, MutationSummary,
    QueryCreator, SelectQueryBuilder, UpdateQueryBuilder,
};
pub use query_error::{BoxError, OnNoResult, QueryError};
pub use row::Row;
