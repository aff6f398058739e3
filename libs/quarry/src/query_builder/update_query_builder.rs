// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::{
    executor::{QueryExecutor, QueryId, QueryResult},
    node::{ExplainNode, Expression, QueryNode, UpdateQueryNode},
    parser::{UpdateObject, parse_update_object},
    plugin::QueryPlugin,
    query_error::QueryError,
};

use super::{
    Conditional, Executable, ExpressionFactory, MutationOutput, ReturningInterface,
    WhereInterface, mutation_output::shape_mutation_result,
};

#[derive(Debug, Clone)]
pub struct UpdateQueryBuilder {
    query_id: QueryId,
    node: Arc<UpdateQueryNode>,
    executor: QueryExecutor,
}

impl UpdateQueryBuilder {
    pub(crate) fn new(query_id: QueryId, node: UpdateQueryNode, executor: QueryExecutor) -> Self {
        Self {
            query_id,
            node: Arc::new(node),
            executor,
        }
    }

    pub fn node(&self) -> &UpdateQueryNode {
        &self.node
    }

    /// Columns to set. Repeated calls accumulate.
    pub fn set(&self, updates: impl Into<UpdateObject>) -> Result<Self, QueryError> {
        let updates = parse_update_object(updates.into())?;
        Ok(self.with_node(self.node.with_updates(updates)))
    }

    /// Columns to set, built from expression helpers:
    /// `set_with(|eb| UpdateObject::new().set("age", eb.bin(eb.ref_("age"), Add, 1)))`
    pub fn set_with(
        &self,
        build: impl FnOnce(&ExpressionFactory) -> UpdateObject,
    ) -> Result<Self, QueryError> {
        self.set(build(&ExpressionFactory::new(self.executor.clone())))
    }

    pub fn explain(&self, format: Option<&str>, options: Option<Expression>) -> Self {
        self.with_node(self.node.with_explain(ExplainNode {
            format: format.map(str::to_owned),
            options,
        }))
    }

    /// A builder for the same query whose executor also runs `plugin`
    pub fn with_plugin(&self, plugin: impl QueryPlugin + 'static) -> Self {
        Self {
            executor: self.executor.with_plugin(Arc::new(plugin)),
            ..self.clone()
        }
    }

    fn with_node(&self, node: UpdateQueryNode) -> Self {
        Self {
            node: Arc::new(node),
            ..self.clone()
        }
    }
}

impl WhereInterface for UpdateQueryBuilder {
    fn where_expr(&self, predicate: impl Into<Expression>) -> Self {
        self.with_node(self.node.with_where(predicate.into()))
    }
}

impl ReturningInterface for UpdateQueryBuilder {
    fn returning_expressions(&self, selections: Vec<Expression>) -> Self {
        self.with_node(self.node.with_returning(selections))
    }
}

impl Conditional for UpdateQueryBuilder {}

impl Executable for UpdateQueryBuilder {
    type Output = MutationOutput;

    fn query_id(&self) -> &QueryId {
        &self.query_id
    }

    fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    fn to_operation_node(&self) -> QueryNode {
        QueryNode::Update(self.node.clone())
    }

    fn shape_result(&self, node: &QueryNode, result: QueryResult) -> Vec<MutationOutput> {
        shape_mutation_result(node, result, self.executor.supports_returning())
    }
}
