//! Query execution for composed statements.
//!
//! Runs a [`Statement`] against anything that can execute Postgres queries:
//! the pool for one-off reads, or `&mut *tx` inside a transaction so several
//! statements commit or roll back together.

use sqlx::postgres::PgArguments;
use sqlx::{Arguments, PgExecutor};

use crate::error::StoreResult;
use crate::statement::{Param, Statement};

/// Encode a statement's parameters in order.
fn arguments(statement: &Statement) -> StoreResult<PgArguments> {
    let mut args = PgArguments::default();
    for param in statement.params() {
        let added = match param {
            Param::Int(value) => args.add(*value),
            Param::Text(value) => args.add(value.clone()),
            Param::NullableText(value) => args.add(value.clone()),
            Param::IntArray(values) => args.add(values.clone()),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

/// Execute a statement, returning the number of rows it affected.
pub async fn execute<'c, E>(executor: E, statement: &Statement) -> StoreResult<u64>
where
    E: PgExecutor<'c>,
{
    let args = arguments(statement)?;
    let result = sqlx::query_with(statement.sql(), args)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
