// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![cfg(test)]

//! Test assertion to check SQL statements and parameters.

/// Assert that the given parameters match the expected ones, in order.
///
/// # Example:
/// ```
/// let actual_params = vec![Value::Int(1), Value::Text("hello".into())];
/// assert_params!(actual_params, 1, "hello"); // will pass
/// ```
macro_rules! assert_params {
    ($actual_params:expr) => {
        assert!($actual_params.is_empty(), "Extra actual parameters");
    };
    ($actual_params:expr, $($expected_param:expr),+) => {
        let expected: Vec<$crate::node::Value> =
            vec![$($crate::node::Value::from($expected_param)),+];
        assert_eq!($actual_params, expected, "Parameter mismatch");
    };
}

/// Assert on the `(sql, params)` pair produced by [`crate::compiler::ExpressionBuilder::to_sql`]
/// (or any other function returning the same shape).
macro_rules! assert_binding {
    ($actual:expr, $expected_stmt:expr) => {
        let (actual_stmt, actual_params) = $actual;
        assert_eq!(actual_stmt, $expected_stmt);
        assert_params!(actual_params);
    };
    ($actual:expr, $expected_stmt:expr, $($rest:expr),+) => {
        let (actual_stmt, actual_params) = $actual;
        assert_eq!(actual_stmt, $expected_stmt);
        assert_params!(actual_params, $($rest),+);
    };
}
