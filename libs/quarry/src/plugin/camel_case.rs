// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase};

use crate::{
    executor::{QueryId, QueryResult},
    node::QueryNode,
    query_error::QueryError,
};

use super::{OperationNodeTransformer, QueryPlugin};

/// Lets callers write camelCase identifiers against a snake_case schema.
///
/// Identifiers in queries are converted to snake_case (or SCREAMING_SNAKE_CASE with
/// [`CamelCasePlugin::upper_case`]) and result column names back to camelCase. Raw SQL
/// fragments and function names are left alone.
#[derive(Debug, Clone, Default)]
pub struct CamelCasePlugin {
    upper_case: bool,
}

impl CamelCasePlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upper_case(self) -> Self {
        Self { upper_case: true }
    }
}

struct SnakeCaseTransformer {
    upper_case: bool,
}

impl OperationNodeTransformer for SnakeCaseTransformer {
    fn transform_identifier(&self, identifier: &str) -> String {
        if self.upper_case {
            identifier.to_shouty_snake_case()
        } else {
            identifier.to_snake_case()
        }
    }
}

#[async_trait]
impl QueryPlugin for CamelCasePlugin {
    fn transform_query(&self, node: QueryNode, _query_id: &QueryId) -> QueryNode {
        SnakeCaseTransformer {
            upper_case: self.upper_case,
        }
        .transform_query(node)
    }

    async fn transform_result(
        &self,
        result: QueryResult,
        _query_id: &QueryId,
    ) -> Result<QueryResult, QueryError> {
        Ok(QueryResult {
            rows: result
                .rows
                .into_iter()
                .map(|row| row.map_columns(|column| column.to_lower_camel_case()))
                .collect(),
            ..result
        })
    }
}
