use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::facility::{Facility, FacilityUpdate, NewFacility};

/// Store for facility records. Rows are always inserted inactive; activation
/// is a batch-level switch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FacilityRepository: Send + Sync {
    /// Inserts a single facility and commits it immediately.
    async fn insert_one(&self, batch_id: Uuid, input: &NewFacility) -> anyhow::Result<Facility>;

    /// Inserts every facility inside one transaction. Either all rows become
    /// visible or none do.
    async fn insert_all(
        &self,
        batch_id: Uuid,
        inputs: &[NewFacility],
    ) -> anyhow::Result<Vec<Facility>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Facility>>;

    async fn find_by_batch(&self, batch_id: Uuid) -> anyhow::Result<Vec<Facility>>;

    /// Page of facilities plus the total count, newest first.
    async fn list(&self, page: i64, page_size: i64) -> anyhow::Result<(Vec<Facility>, i64)>;

    async fn update(&self, id: i64, changes: &FacilityUpdate) -> anyhow::Result<Option<Facility>>;

    async fn delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Flips the active flag for every facility in the batch, returning the
    /// number of rows touched.
    async fn set_active_by_batch(&self, batch_id: Uuid, active: bool) -> anyhow::Result<u64>;

    /// Removes every facility in the batch, returning the number deleted.
    /// Ledger rows are not touched here.
    async fn delete_by_batch(&self, batch_id: Uuid) -> anyhow::Result<u64>;
}
