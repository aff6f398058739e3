// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod common;

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::TryStreamExt;
use quarry::{
    CamelCasePlugin, InsertObject, PostgresDialect, QueryError, QueryId, QueryNode, QueryResult,
    Row, Value, prelude::*, testing::MockDriver,
};
use test_log::test;

use common::{assert_compiled, creator};

/// Records the order in which its hooks run
struct Recorder {
    name: &'static str,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn record(&self, hook: &str) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{}:{hook}", self.name));
    }
}

#[async_trait]
impl QueryPlugin for Recorder {
    fn transform_query(&self, node: QueryNode, _query_id: &QueryId) -> QueryNode {
        self.record("query");
        node
    }

    async fn transform_result(
        &self,
        result: QueryResult,
        _query_id: &QueryId,
    ) -> Result<QueryResult, QueryError> {
        self.record("result");
        Ok(result)
    }
}

fn camel_rows() -> Vec<Row> {
    vec![Row::from_iter([
        ("first_name", Value::from("Jennifer")),
        ("last_name", Value::from("Aniston")),
    ])]
}

#[test(tokio::test)]
async fn camel_case_round_trip() {
    let (db, driver) = creator(PostgresDialect, MockDriver::new().with_rows(camel_rows()));
    let db = db.with_plugin(CamelCasePlugin::new());

    let rows = db
        .select_from("personDetails")
        .select(&["firstName", "lastName"])
        .where_eq("lastName", "Aniston")
        .execute()
        .await
        .unwrap();

    assert_compiled(
        &driver.executed_queries()[0],
        r#"SELECT "first_name", "last_name" FROM "person_details" WHERE "last_name" = $1"#,
        vec![Value::from("Aniston")],
    );
    assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["firstName", "lastName"]);
}

#[test(tokio::test)]
async fn result_hooks_run_once_per_stream_chunk() {
    let rows: Vec<Row> = (0..3).flat_map(|_| camel_rows()).collect();
    let (db, _) = creator(PostgresDialect, MockDriver::new().with_stream_rows(rows));
    let calls = Arc::new(Mutex::new(vec![]));
    let query = db
        .with_plugin(Recorder {
            name: "recorder",
            calls: calls.clone(),
        })
        .with_plugin(CamelCasePlugin::new())
        .select_from("person");

    let streamed: Vec<Row> = query
        .stream_with_chunk_size(2)
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(streamed.len(), 3);
    assert!(streamed.iter().all(|row| row.get("firstName").is_some()));
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["recorder:query", "recorder:result", "recorder:result"]
    );
}

#[test(tokio::test)]
async fn hooks_run_in_registration_order() {
    let (db, _) = creator(PostgresDialect, MockDriver::new());
    let calls = Arc::new(Mutex::new(vec![]));
    let recorder = |name| Recorder {
        name,
        calls: calls.clone(),
    };

    db.with_plugin(recorder("first"))
        .insert_into("person")
        .values(InsertObject::from([("id", 1)]))
        .unwrap()
        .with_plugin(recorder("second"))
        .execute()
        .await
        .unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["first:query", "second:query", "first:result", "second:result"]
    );
}

#[test]
fn builder_plugins_do_not_leak_into_the_creator() {
    let (db, _) = creator(PostgresDialect, MockDriver::new());
    let base = db.select_from("personDetails");
    let camel = base.with_plugin(CamelCasePlugin::new());

    assert_eq!(
        base.compile().unwrap().sql,
        r#"SELECT * FROM "personDetails""#
    );
    assert_eq!(
        camel.compile().unwrap().sql,
        r#"SELECT * FROM "person_details""#
    );
    assert_eq!(camel.node(), base.node());
}

#[test]
fn schema_is_applied_to_every_unqualified_table() {
    let (db, _) = creator(PostgresDialect, MockDriver::new());
    let db = db.with_schema("app");

    let pets = db.select_from("pet").select(&["owner_id"]);
    let compiled = db
        .delete_from("person")
        .where_("id", quarry::BinaryOperator::In, pets)
        .compile()
        .unwrap();
    assert_eq!(
        compiled.sql,
        r#"DELETE FROM "app"."person" WHERE "id" IN (SELECT "owner_id" FROM "app"."pet")"#
    );

    let qualified = db.update_table("audit.person").set([("age", 1)]).unwrap();
    assert_eq!(
        qualified.compile().unwrap().sql,
        r#"UPDATE "audit"."person" SET "age" = $1"#
    );
}
