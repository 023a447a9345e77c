//! Generic optimistic-locking save routine.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use gatehouse_core::aggregate::Aggregate;
use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;
use sqlx::{PgConnection, PgPool};

/// Maps a driver error to the domain's infrastructure variant.
pub(crate) fn infra(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

/// SQL binding for one aggregate kind: how to insert it, how to update it
/// conditionally on the previous version, and how to read the stored
/// version for conflict diagnostics.
#[async_trait]
pub trait AggregateBinding: Aggregate {
    /// Inserts the aggregate's full serialized state as a new row.
    async fn insert(&self, conn: &mut PgConnection) -> Result<(), DomainError>;

    /// Issues `UPDATE ... WHERE id = $id AND version = $version - 1` and
    /// returns the affected-row count.
    async fn update(&self, conn: &mut PgConnection) -> Result<u64, DomainError>;

    /// Reads the currently stored version, if the row exists.
    async fn stored_version(
        conn: &mut PgConnection,
        id: Uid,
    ) -> Result<Option<i64>, DomainError>;
}

/// A callback run inside the save transaction, after the aggregate row
/// write, for related writes that must commit atomically with it.
pub type PostSave = Box<
    dyn for<'t> FnOnce(&'t mut PgConnection) -> BoxFuture<'t, Result<(), DomainError>> + Send,
>;

/// Helper that pins the callback's higher-ranked lifetime so closures can be
/// passed without type annotations.
pub fn post_save<F>(f: F) -> PostSave
where
    F: for<'t> FnOnce(&'t mut PgConnection) -> BoxFuture<'t, Result<(), DomainError>>
        + Send
        + 'static,
{
    Box::new(f)
}

/// Persists an aggregate inside one transaction with optimistic locking.
///
/// Version 0 inserts (the identifier is freshly generated, so no conflict
/// check is needed); version >= 1 updates conditionally on the previous
/// stored version. When the conditional update touches zero rows another
/// writer won the race, and the stored version is fetched for the
/// `OUTDATED_VERSION` diagnostics. The optional `post_save` callback shares
/// the transaction, so "save returned Ok" means the aggregate row and every
/// post-save side effect are durably committed together; any error rolls
/// the whole transaction back.
///
/// # Errors
///
/// Returns `DomainError::ContractViolation` when an existing aggregate was
/// never passed through `prepare_update`, `DomainError::OutdatedVersion` on
/// a lost optimistic race, `DomainError::NotFound` when the row vanished
/// entirely, or `DomainError::Infrastructure` on driver failures.
pub async fn save_aggregate<A>(
    pool: &PgPool,
    aggregate: &A,
    post_save: Option<PostSave>,
) -> Result<(), DomainError>
where
    A: AggregateBinding,
{
    let mut tx = pool.begin().await.map_err(infra)?;

    if aggregate.version() == 0 {
        aggregate.insert(&mut tx).await?;
    } else {
        if !aggregate.meta().is_update_prepared() {
            return Err(DomainError::ContractViolation(format!(
                "save called on {} {} (version {}) without prepare_update",
                aggregate.aggregate_name(),
                aggregate.id(),
                aggregate.version()
            )));
        }
        let affected = aggregate.update(&mut tx).await?;
        if affected == 0 {
            let expected = aggregate.version() - 1;
            return match A::stored_version(&mut tx, aggregate.id()).await? {
                Some(actual) => Err(DomainError::OutdatedVersion {
                    aggregate_id: aggregate.id(),
                    expected,
                    actual,
                }),
                None => Err(DomainError::NotFound {
                    entity: aggregate.aggregate_name(),
                    id: aggregate.id(),
                }),
            };
        }
    }

    if let Some(callback) = post_save {
        callback(&mut tx).await?;
    }

    // Rollback is implicit: an early return drops the transaction.
    tx.commit().await.map_err(infra)?;
    Ok(())
}
