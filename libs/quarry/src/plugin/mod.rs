// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Query and result hooks run by the executor around every round trip.
//!
//! Query hooks run, in registration order, right before compilation. Result hooks run, in
//! registration order, right after the driver returns (once per chunk when streaming).

use async_trait::async_trait;

use crate::{
    executor::{QueryId, QueryResult},
    node::QueryNode,
    query_error::QueryError,
};

mod camel_case;
mod transformer;
mod with_schema;

pub use camel_case::CamelCasePlugin;
pub use transformer::OperationNodeTransformer;
pub use with_schema::WithSchemaPlugin;

#[async_trait]
pub trait QueryPlugin: Send + Sync {
    /// Rewrite the query before it is compiled. Must not depend on anything but its inputs.
    fn transform_query(&self, node: QueryNode, query_id: &QueryId) -> QueryNode;

    async fn transform_result(
        &self,
        result: QueryResult,
        _query_id: &QueryId,
    ) -> Result<QueryResult, QueryError> {
        Ok(result)
    }
}
