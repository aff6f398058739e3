// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The operation node tree: an immutable representation of a single query.
//!
//! Nodes are plain values. Builders never modify a node; they call the `with_*` functions on the
//! current root to obtain a new root that shares every unchanged subtree (through `Arc`).

use std::{fmt::Display, sync::Arc};

pub mod clause;
pub mod delete;
pub mod expression;
pub mod insert;
pub mod on_conflict;
pub mod select;
pub mod table;
pub mod update;
pub mod value;

pub use clause::{ColumnUpdateNode, ExplainNode, ReturningNode};
pub use delete::DeleteQueryNode;
pub use expression::{
    AliasNode, BinaryOperationNode, BinaryOperator, Expression, FunctionNode, RawNode,
    ReferenceNode, UnaryOperationNode, UnaryOperator,
};
pub use insert::{InsertQueryNode, InsertSource, ValuesNode};
pub use on_conflict::{ConflictAction, ConflictTarget, OnConflictNode, OnDuplicateKeyNode};
pub use select::{OrderByItemNode, Ordering, SelectQueryNode};
pub use table::{ColumnNode, FromItem, JoinKind, JoinNode, TableNode};
pub use update::UpdateQueryNode;
pub use value::Value;

/// The root of a query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Select(Arc<SelectQueryNode>),
    Insert(Arc<InsertQueryNode>),
    Update(Arc<UpdateQueryNode>),
    Delete(Arc<DeleteQueryNode>),
}

impl QueryNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            QueryNode::Select(_) => NodeKind::SelectQuery,
            QueryNode::Insert(_) => NodeKind::InsertQuery,
            QueryNode::Update(_) => NodeKind::UpdateQuery,
            QueryNode::Delete(_) => NodeKind::DeleteQuery,
        }
    }

    /// Insert, update and delete statements
    pub fn is_mutation(&self) -> bool {
        !matches!(self, QueryNode::Select(_))
    }

    pub fn returning(&self) -> Option<&ReturningNode> {
        match self {
            QueryNode::Select(_) => None,
            QueryNode::Insert(node) => node.returning.as_ref(),
            QueryNode::Update(node) => node.returning.as_ref(),
            QueryNode::Delete(node) => node.returning.as_ref(),
        }
    }

    pub fn explain(&self) -> Option<&ExplainNode> {
        match self {
            QueryNode::Select(node) => node.explain.as_ref(),
            QueryNode::Insert(node) => node.explain.as_ref(),
            QueryNode::Update(node) => node.explain.as_ref(),
            QueryNode::Delete(node) => node.explain.as_ref(),
        }
    }
}

impl From<SelectQueryNode> for QueryNode {
    fn from(node: SelectQueryNode) -> Self {
        QueryNode::Select(Arc::new(node))
    }
}

impl From<InsertQueryNode> for QueryNode {
    fn from(node: InsertQueryNode) -> Self {
        QueryNode::Insert(Arc::new(node))
    }
}

impl From<UpdateQueryNode> for QueryNode {
    fn from(node: UpdateQueryNode) -> Self {
        QueryNode::Update(Arc::new(node))
    }
}

impl From<DeleteQueryNode> for QueryNode {
    fn from(node: DeleteQueryNode) -> Self {
        QueryNode::Delete(Arc::new(node))
    }
}

/// Discriminant of every construct a dialect may or may not be able to render. The compiler asks
/// the active dialect about each kind before rendering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Table,
    Reference,
    Value,
    Raw,
    BinaryOperation,
    UnaryOperation,
    Function,
    Alias,
    List,
    SelectQuery,
    InsertQuery,
    UpdateQuery,
    DeleteQuery,
    Values,
    DefaultInsertValue,
    DefaultValues,
    OnConflict,
    OnDuplicateKey,
    InsertIgnore,
    Replace,
    Returning,
    Explain,
    Join,
    OrderBy,
    Limit,
    Offset,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Table => "table",
            NodeKind::Reference => "column reference",
            NodeKind::Value => "value",
            NodeKind::Raw => "raw sql",
            NodeKind::BinaryOperation => "binary operation",
            NodeKind::UnaryOperation => "unary operation",
            NodeKind::Function => "function call",
            NodeKind::Alias => "alias",
            NodeKind::List => "value list",
            NodeKind::SelectQuery => "select",
            NodeKind::InsertQuery => "insert",
            NodeKind::UpdateQuery => "update",
            NodeKind::DeleteQuery => "delete",
            NodeKind::Values => "values",
            NodeKind::DefaultInsertValue => "default insert value",
            NodeKind::DefaultValues => "default values",
            NodeKind::OnConflict => "on conflict",
            NodeKind::OnDuplicateKey => "on duplicate key update",
            NodeKind::InsertIgnore => "insert ignore",
            NodeKind::Replace => "replace into",
            NodeKind::Returning => "returning",
            NodeKind::Explain => "explain",
            NodeKind::Join => "join",
            NodeKind::OrderBy => "order by",
            NodeKind::Limit => "limit",
            NodeKind::Offset => "offset",
        };
        f.write_str(name)
    }
}
