// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    executor::QueryId,
    node::{QueryNode, Value},
};

/// The output of compilation: what a driver needs to run the query.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// SQL text with dialect placeholders
    pub sql: String,
    /// One entry per placeholder, in textual order
    pub parameters: Vec<Value>,
    /// The node `sql` was compiled from (after plugin transformation)
    pub query: QueryNode,
    pub query_id: QueryId,
}
