// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;

use crate::{
    executor::QueryId,
    node::{QueryNode, TableNode},
};

use super::{OperationNodeTransformer, QueryPlugin};

/// Qualify every unqualified table a statement reads or writes with `schema`.
///
/// Column references are left as written, since their qualifier may be an alias.
#[derive(Debug, Clone)]
pub struct WithSchemaPlugin {
    schema: String,
}

impl WithSchemaPlugin {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
        }
    }
}

impl OperationNodeTransformer for WithSchemaPlugin {
    fn transform_table(&self, table: &TableNode) -> TableNode {
        match table.schema {
            Some(_) => table.clone(),
            None => table.with_schema(&self.schema),
        }
    }
}

#[async_trait]
impl QueryPlugin for WithSchemaPlugin {
    fn transform_query(&self, node: QueryNode, _query_id: &QueryId) -> QueryNode {
        OperationNodeTransformer::transform_query(self, node)
    }
}
