use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::facility::Facility;
use crate::domain::repository::facility_repository::FacilityRepository;

#[derive(Debug, thiserror::Error)]
pub enum ManageBatchError {
    #[error("no facilities found for batch {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Batch-scoped operations on facilities: list, activate, deactivate, delete.
/// Only the facility store is touched; the batch ledger keeps its history
/// even after the facilities are gone.
pub struct ManageBatchUsecase {
    facility_repo: Arc<dyn FacilityRepository>,
}

impl ManageBatchUsecase {
    pub fn new(facility_repo: Arc<dyn FacilityRepository>) -> Self {
        Self { facility_repo }
    }

    pub async fn list_facilities(&self, batch_id: Uuid) -> anyhow::Result<Vec<Facility>> {
        self.facility_repo.find_by_batch(batch_id).await
    }

    /// Returns the number of facilities activated.
    pub async fn activate(&self, batch_id: Uuid) -> Result<u64, ManageBatchError> {
        self.set_active(batch_id, true).await
    }

    /// Returns the number of facilities deactivated.
    pub async fn deactivate(&self, batch_id: Uuid) -> Result<u64, ManageBatchError> {
        self.set_active(batch_id, false).await
    }

    async fn set_active(&self, batch_id: Uuid, active: bool) -> Result<u64, ManageBatchError> {
        let touched = self
            .facility_repo
            .set_active_by_batch(batch_id, active)
            .await?;
        if touched == 0 {
            return Err(ManageBatchError::NotFound(batch_id));
        }
        tracing::info!(batch_id = %batch_id, active, count = touched, "batch activation changed");
        Ok(touched)
    }

    /// Returns the number of facilities deleted.
    pub async fn delete(&self, batch_id: Uuid) -> Result<u64, ManageBatchError> {
        let deleted = self.facility_repo.delete_by_batch(batch_id).await?;
        if deleted == 0 {
            return Err(ManageBatchError::NotFound(batch_id));
        }
        tracing::info!(batch_id = %batch_id, count = deleted, "batch facilities deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::facility_repository::MockFacilityRepository;

    #[tokio::test]
    async fn activate_reports_the_rows_touched() {
        let mut repo = MockFacilityRepository::new();
        repo.expect_set_active_by_batch()
            .times(1)
            .withf(|_, active| *active)
            .returning(|_, _| Ok(3));

        let count = ManageBatchUsecase::new(Arc::new(repo))
            .activate(Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn deactivate_flips_the_flag_off() {
        let mut repo = MockFacilityRepository::new();
        repo.expect_set_active_by_batch()
            .times(1)
            .withf(|_, active| !*active)
            .returning(|_, _| Ok(2));

        let count = ManageBatchUsecase::new(Arc::new(repo))
            .deactivate(Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn activating_an_unknown_batch_is_not_found() {
        let mut repo = MockFacilityRepository::new();
        repo.expect_set_active_by_batch()
            .times(1)
            .returning(|_, _| Ok(0));

        let result = ManageBatchUsecase::new(Arc::new(repo))
            .activate(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(ManageBatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_facilities_only() {
        let mut repo = MockFacilityRepository::new();
        repo.expect_delete_by_batch().times(1).returning(|_| Ok(4));

        let count = ManageBatchUsecase::new(Arc::new(repo))
            .delete(Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn deleting_an_empty_batch_is_not_found() {
        let mut repo = MockFacilityRepository::new();
        repo.expect_delete_by_batch().times(1).returning(|_| Ok(0));

        let result = ManageBatchUsecase::new(Arc::new(repo))
            .delete(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(ManageBatchError::NotFound(_))));
    }
}
