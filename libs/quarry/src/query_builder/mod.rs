// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Immutable, chainable builders for each statement kind.
//!
//! Every method takes `&self` and returns a new builder; the receiver stays usable and unchanged.
//! Methods whose input can be malformed (an empty update set, for example) return
//! `Result<Self, QueryError>` so the problem is reported where it was introduced. Constructs the
//! dialect can't render are reported later, when the query is compiled.

mod delete_query_builder;
mod executable;
mod expression_factory;
mod insert_query_builder;
mod interfaces;
mod mutation_output;
mod on_conflict_builder;
mod query_creator;
mod select_query_builder;
mod update_query_builder;

pub use delete_query_builder::DeleteQueryBuilder;
pub use executable::{DEFAULT_STREAM_CHUNK_SIZE, Executable};
pub use expression_factory::ExpressionFactory;
pub use insert_query_builder::InsertQueryBuilder;
pub use interfaces::{Conditional, ReturningInterface, WhereInterface};
pub use mutation_output::{MutationOutput, MutationSummary};
pub use on_conflict_builder::{
    OnConflictBuilder, OnConflictDoNothingBuilder, OnConflictUpdateBuilder,
};
pub use query_creator::QueryCreator;
pub use select_query_builder::SelectQueryBuilder;
pub use update_query_builder::UpdateQueryBuilder;
