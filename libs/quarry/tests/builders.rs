// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod common;

use quarry::{
    InsertObject, MysqlDialect, QueryError, SqliteDialect, Value, prelude::*, raw,
    testing::MockDriver,
};

use common::{assert_compiled, creator, postgres};

#[test]
fn repeated_calls_build_equal_independent_roots() {
    let db = postgres();
    let base = db
        .insert_into("person")
        .values(InsertObject::from([("first_name", "Jennifer")]))
        .unwrap();

    let first = base.returning(&["id"]);
    let second = base.returning(&["id"]);

    assert_eq!(first.node(), second.node());
    assert!(base.node().returning.is_none());
    assert_compiled(
        &base.compile().unwrap(),
        r#"INSERT INTO "person" ("first_name") VALUES ($1)"#,
        vec![Value::from("Jennifer")],
    );
}

#[test]
fn row_list_columns_are_the_union_in_first_seen_order() {
    let compiled = postgres()
        .insert_into("t")
        .values(vec![
            InsertObject::from([("a", 1), ("b", 2)]),
            InsertObject::from([("b", 3), ("a", 4)]),
        ])
        .unwrap()
        .compile()
        .unwrap();

    assert_compiled(
        &compiled,
        r#"INSERT INTO "t" ("a", "b") VALUES ($1, $2), ($3, $4)"#,
        vec![1.into(), 2.into(), 4.into(), 3.into()],
    );
}

#[test]
fn missing_values_render_as_the_dialect_default() {
    let rows = || {
        vec![
            InsertObject::from([("a", 1)]),
            InsertObject::from([("b", 2)]),
        ]
    };

    let postgres = postgres()
        .insert_into("t")
        .values(rows())
        .unwrap()
        .compile()
        .unwrap();
    assert_eq!(
        postgres.sql,
        r#"INSERT INTO "t" ("a", "b") VALUES ($1, DEFAULT), (DEFAULT, $2)"#
    );

    let (sqlite, _) = creator(SqliteDialect, MockDriver::new());
    let sqlite = sqlite
        .insert_into("t")
        .values(rows())
        .unwrap()
        .compile()
        .unwrap();
    assert_eq!(
        sqlite.sql,
        r#"INSERT INTO "t" ("a", "b") VALUES (?, NULL), (NULL, ?)"#
    );
}

#[test]
fn explicit_columns_reject_unknown_keys() {
    let error = postgres()
        .insert_into("person")
        .columns(&["first_name"])
        .unwrap()
        .values(InsertObject::from([("first_name", "Jennifer"), ("age", "40")]))
        .unwrap_err();

    assert!(matches!(error, QueryError::Shape(_)));
}

#[test]
fn placeholders_follow_nested_raw_parameters() {
    let db = postgres();

    let literal = db
        .insert_into("person")
        .values(
            InsertObject::new()
                .set("first_name", "Jennifer")
                .set("last_name", raw("'Ani' || 'ston'")),
        )
        .unwrap()
        .compile()
        .unwrap();
    assert_compiled(
        &literal,
        r#"INSERT INTO "person" ("first_name", "last_name") VALUES ($1, 'Ani' || 'ston')"#,
        vec![Value::from("Jennifer")],
    );

    let parameterized = db
        .insert_into("person")
        .values(
            InsertObject::new()
                .set("first_name", "Jennifer")
                .set(
                    "last_name",
                    raw("").push_value("Ani").push_sql(" || ").push_value("ston"),
                )
                .set("age", 40),
        )
        .unwrap()
        .compile()
        .unwrap();
    assert_compiled(
        &parameterized,
        r#"INSERT INTO "person" ("first_name", "last_name", "age") VALUES ($1, $2 || $3, $4)"#,
        vec!["Jennifer".into(), "Ani".into(), "ston".into(), 40.into()],
    );
}

#[test]
fn later_conflict_clause_replaces_the_earlier_one() {
    let base = postgres()
        .insert_into("person")
        .values(InsertObject::from([("id", 1), ("age", 40)]))
        .unwrap();

    let update_then_nothing = base
        .on_conflict(|oc| oc.column("id").do_update_set([("age", 41)]))
        .unwrap()
        .on_conflict(|oc| Ok(oc.column("id").do_nothing()))
        .unwrap()
        .compile()
        .unwrap();
    assert_compiled(
        &update_then_nothing,
        r#"INSERT INTO "person" ("id", "age") VALUES ($1, $2) ON CONFLICT ("id") DO NOTHING"#,
        vec![1.into(), 40.into()],
    );

    let nothing_then_update = base
        .on_conflict(|oc| Ok(oc.column("id").do_nothing()))
        .unwrap()
        .on_conflict(|oc| oc.column("id").do_update_set([("age", 41)]))
        .unwrap()
        .compile()
        .unwrap();
    assert_compiled(
        &nothing_then_update,
        r#"INSERT INTO "person" ("id", "age") VALUES ($1, $2) ON CONFLICT ("id") DO UPDATE SET "age" = $3"#,
        vec![1.into(), 40.into(), 41.into()],
    );
}

#[test]
fn conflict_clause_is_a_capability_error_on_mysql() {
    let (db, _) = creator(MysqlDialect, MockDriver::new());
    let query = db
        .insert_into("person")
        .values(InsertObject::from([("id", 1)]))
        .unwrap()
        .on_conflict(|oc| Ok(oc.column("id").do_nothing()))
        .unwrap();

    assert!(matches!(
        query.compile(),
        Err(QueryError::Capability { dialect: "mysql", .. })
    ));
}

#[test]
fn conditional_where_keeps_a_single_builder_type() {
    let db = postgres();
    let by_name = |name: Option<&str>| {
        db.select_from("person")
            .select(&["id"])
            .if_then(name.is_some(), |query| {
                query.where_eq("first_name", name.unwrap_or_default())
            })
            .compile()
            .unwrap()
    };

    assert_eq!(by_name(None).sql, r#"SELECT "id" FROM "person""#);
    assert_compiled(
        &by_name(Some("Jennifer")),
        r#"SELECT "id" FROM "person" WHERE "first_name" = $1"#,
        vec![Value::from("Jennifer")],
    );
}

#[test]
fn identical_trees_compile_identically() {
    let build = || {
        postgres()
            .update_table("person")
            .set([("age", 41)])
            .unwrap()
            .where_eq("id", 1)
            .returning_all()
            .compile()
            .unwrap()
    };

    let (first, second) = (build(), build());
    assert_eq!(first.sql, second.sql);
    assert_eq!(first.parameters, second.parameters);
    assert_ne!(first.query_id, second.query_id);
}
