//! Shared row-mapping helpers.

use gatehouse_core::aggregate::AggregateMeta;
use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::save::infra;

/// Reconstructs the base aggregate fields every table carries.
pub(crate) fn meta_from_row(row: &PgRow) -> Result<AggregateMeta, DomainError> {
    Ok(AggregateMeta::from_stored(
        Uid::from(row.try_get::<Uuid, _>("id").map_err(infra)?),
        row.try_get("version").map_err(infra)?,
        row.try_get("created_at").map_err(infra)?,
        row.try_get::<Option<Uuid>, _>("created_by")
            .map_err(infra)?
            .map(Uid::from),
        row.try_get("last_modified_at").map_err(infra)?,
        row.try_get::<Option<Uuid>, _>("last_modified_by")
            .map_err(infra)?
            .map(Uid::from),
    ))
}
