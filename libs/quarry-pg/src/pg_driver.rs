// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt, TryStreamExt, pin_mut, stream::BoxStream};
use quarry::{CompiledQuery, Driver, DriverError, QueryResult};
use tokio_postgres::types::ToSql;
use tracing::{debug, instrument};

use crate::{
    config::PgConfig,
    database_pool::DatabasePool,
    environment::Environment,
    pg_error::PgDriverError,
    pg_value::{PgParam, to_row},
};

/// A [Driver] running queries on a pooled Postgres connection.
///
/// Each call checks a connection out of the pool for its duration; a stream keeps its connection
/// until it is dropped or exhausted.
pub struct PostgresDriver {
    pool: DatabasePool,
}

impl PostgresDriver {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn from_config(config: &PgConfig) -> Result<Self, PgDriverError> {
        Ok(Self::new(DatabasePool::create(config).await?))
    }

    pub async fn from_env(env: &dyn Environment) -> Result<Self, PgDriverError> {
        Self::from_config(&PgConfig::from_env(env)?).await
    }

    #[instrument(
        name = "PostgresDriver::execute"
        level = "trace"
        skip_all
        )]
    async fn execute(&self, query: &CompiledQuery) -> Result<QueryResult, PgDriverError> {
        let client = self.pool.get_client().await?;
        let params = pg_params(query);
        let params = param_refs(&params);

        // Without a returning clause the server sends no rows, only the affected-row count
        let wants_rows = query.query.returning().is_some() || query.query.explain().is_some();

        if query.query.is_mutation() && !wants_rows {
            let num_affected_rows = client.execute(query.sql.as_str(), &params).await?;
            debug!("Affected {num_affected_rows} rows");

            Ok(QueryResult {
                rows: vec![],
                insert_id: None,
                num_affected_rows: Some(num_affected_rows),
            })
        } else {
            let rows = client
                .query(query.sql.as_str(), &params)
                .await?
                .iter()
                .map(to_row)
                .collect::<Result<Vec<_>, _>>()?;
            let num_affected_rows = query.query.is_mutation().then_some(rows.len() as u64);

            Ok(QueryResult {
                rows,
                insert_id: None,
                num_affected_rows,
            })
        }
    }

    fn chunks<'a>(
        &'a self,
        query: &'a CompiledQuery,
        chunk_size: usize,
    ) -> impl Stream<Item = Result<QueryResult, PgDriverError>> + Send + 'a {
        try_stream! {
            let client = self.pool.get_client().await?;
            let params = pg_params(query);

            let rows = client.query_raw(query.sql.as_str(), param_refs(&params)).await?;
            pin_mut!(rows);

            let mut chunk = Vec::with_capacity(chunk_size);
            while let Some(row) = rows.try_next().await? {
                chunk.push(to_row(&row)?);
                if chunk.len() == chunk_size {
                    yield QueryResult::from_rows(std::mem::replace(
                        &mut chunk,
                        Vec::with_capacity(chunk_size),
                    ));
                }
            }

            if !chunk.is_empty() {
                yield QueryResult::from_rows(chunk);
            }
        }
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    async fn execute_query(&self, query: &CompiledQuery) -> Result<QueryResult, DriverError> {
        Ok(self.execute(query).await?)
    }

    fn stream_query<'a>(
        &'a self,
        query: &'a CompiledQuery,
        chunk_size: usize,
    ) -> BoxStream<'a, Result<QueryResult, DriverError>> {
        self.chunks(query, chunk_size)
            .map_err(DriverError::from)
            .boxed()
    }

    fn supports_returning(&self) -> bool {
        true
    }
}

fn pg_params(query: &CompiledQuery) -> Vec<PgParam<'_>> {
    query.parameters.iter().map(PgParam).collect()
}

fn param_refs<'a>(params: &'a [PgParam<'a>]) -> Vec<&'a (dyn ToSql + Sync)> {
    params
        .iter()
        .map(|param| param as &(dyn ToSql + Sync))
        .collect()
}
