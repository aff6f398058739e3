// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![allow(dead_code)]

use std::sync::Arc;

use quarry::{
    CompiledQuery, Dialect, PostgresDialect, QueryCreator, Row, Value, testing::MockDriver,
};

/// A creator over `driver`, also returned so the test can inspect what it received
pub fn creator(
    dialect: impl Dialect + 'static,
    driver: MockDriver,
) -> (QueryCreator, Arc<MockDriver>) {
    let driver = Arc::new(driver);
    (QueryCreator::new(Arc::new(dialect), driver.clone()), driver)
}

pub fn postgres() -> QueryCreator {
    creator(PostgresDialect, MockDriver::new()).0
}

/// `count` rows of `{"id": n, "first_name": "person_n"}`, numbered from 1
pub fn person_rows(count: i64) -> Vec<Row> {
    (1..=count)
        .map(|id| {
            Row::from_iter([
                ("id", Value::from(id)),
                ("first_name", Value::from(format!("person_{id}"))),
            ])
        })
        .collect()
}

pub fn assert_compiled(compiled: &CompiledQuery, sql: &str, parameters: Vec<Value>) {
    assert_eq!(compiled.sql, sql);
    assert_eq!(compiled.parameters, parameters);
}
