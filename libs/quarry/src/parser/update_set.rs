// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::{node::ColumnUpdateNode, query_error::QueryError};

use super::{insert_values::UpdateObject, reference::parse_column};

/// `{a: 1, b: expr}` into `"a" = $1, "b" = <expr>`
pub fn parse_update_object(object: UpdateObject) -> Result<Arc<[ColumnUpdateNode]>, QueryError> {
    if object.is_empty() {
        return Err(QueryError::shape("update must set at least one column"));
    }

    Ok(object
        .iter()
        .map(|(column, value)| ColumnUpdateNode::new(parse_column(column), value.clone()))
        .collect())
}
