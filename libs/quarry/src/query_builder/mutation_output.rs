// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{executor::QueryResult, node::QueryNode, row::Row};

/// What executing an insert, update or delete yields.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutput {
    /// A row produced by the returning clause
    Row(Row),
    /// The single element returned when no rows come back
    Summary(MutationSummary),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationSummary {
    pub insert_id: Option<i64>,
    pub num_affected_rows: u64,
}

impl MutationOutput {
    pub fn as_row(&self) -> Option<&Row> {
        match self {
            MutationOutput::Row(row) => Some(row),
            MutationOutput::Summary(_) => None,
        }
    }

    pub fn into_row(self) -> Option<Row> {
        match self {
            MutationOutput::Row(row) => Some(row),
            MutationOutput::Summary(_) => None,
        }
    }

    pub fn summary(&self) -> Option<&MutationSummary> {
        match self {
            MutationOutput::Summary(summary) => Some(summary),
            MutationOutput::Row(_) => None,
        }
    }
}

/// Rows are surfaced only when the compiled root asked for them (a returning clause, or an
/// explain) and the driver can deliver them; otherwise a single summary stands in for them.
pub(crate) fn shape_mutation_result(
    node: &QueryNode,
    result: QueryResult,
    supports_returning: bool,
) -> Vec<MutationOutput> {
    let wants_rows =
        node.explain().is_some() || (node.returning().is_some() && supports_returning);

    if wants_rows {
        result.rows.into_iter().map(MutationOutput::Row).collect()
    } else {
        vec![MutationOutput::Summary(MutationSummary {
            insert_id: result.insert_id,
            num_affected_rows: result.num_affected_rows.unwrap_or_default(),
        })]
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{DeleteQueryNode, Expression, TableNode};

    use super::*;

    fn result() -> QueryResult {
        QueryResult {
            rows: vec![[("id", 1)].into_iter().collect()],
            insert_id: Some(1),
            num_affected_rows: Some(1),
        }
    }

    #[test]
    fn rows_need_returning_and_driver_support() {
        let plain: QueryNode = DeleteQueryNode::new(TableNode::new("person")).into();
        let returning: QueryNode = DeleteQueryNode::new(TableNode::new("person"))
            .with_returning(vec![Expression::reference(None, "id")])
            .into();

        let summary = vec![MutationOutput::Summary(MutationSummary {
            insert_id: Some(1),
            num_affected_rows: 1,
        })];

        assert_eq!(shape_mutation_result(&plain, result(), true), summary);
        assert_eq!(shape_mutation_result(&returning, result(), false), summary);
        assert_eq!(
            shape_mutation_result(&returning, result(), true),
            vec![MutationOutput::Row(result().rows[0].clone())]
        );
    }
}
