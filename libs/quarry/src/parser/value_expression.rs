// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Plain values used where an expression is expected become bound parameters.

use bytes::Bytes;

use crate::node::{Expression, Value};

macro_rules! value_expression_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expression {
                fn from(value: $t) -> Self {
                    Expression::Value(Value::from(value))
                }
            }
        )*
    };
}

value_expression_from!(
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    bool,
    &str,
    String,
    Bytes,
    Vec<u8>,
    serde_json::Value,
    Value
);

impl<T: Into<Value>> From<Option<T>> for Expression {
    fn from(value: Option<T>) -> Self {
        Expression::Value(Value::from(value))
    }
}
