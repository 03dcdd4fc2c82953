use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entity::facility::{Facility, FacilityUpdate, NewFacility};
use crate::domain::repository::facility_repository::FacilityRepository;
use crate::domain::service::row_validator::{self, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum FacilityError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("facility {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct FacilityPage {
    pub facilities: Vec<Facility>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Single-facility CRUD, sharing field rules with the CSV row validator so a
/// record is held to the same standard regardless of how it arrived.
pub struct ManageFacilitiesUsecase {
    facility_repo: Arc<dyn FacilityRepository>,
    default_page_size: i64,
}

impl ManageFacilitiesUsecase {
    pub fn new(facility_repo: Arc<dyn FacilityRepository>, default_page_size: i64) -> Self {
        Self {
            facility_repo,
            default_page_size,
        }
    }

    /// Creates one facility. Without a batch id the record gets a fresh
    /// single-member batch so batch-scoped operations still apply to it.
    pub async fn create(
        &self,
        name: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
        batch_id: Option<Uuid>,
    ) -> Result<Facility, FacilityError> {
        let input = NewFacility {
            name: row_validator::valid_name(name)?,
            address: row_validator::valid_address(address)?,
            phone: row_validator::valid_phone(phone)?,
        };
        let batch_id = batch_id.unwrap_or_else(Uuid::new_v4);
        let facility = self.facility_repo.insert_one(batch_id, &input).await?;
        Ok(facility)
    }

    pub async fn get(&self, id: i64) -> Result<Facility, FacilityError> {
        self.facility_repo
            .find_by_id(id)
            .await?
            .ok_or(FacilityError::NotFound(id))
    }

    pub async fn list(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<FacilityPage, FacilityError> {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(self.default_page_size).clamp(1, 500);
        let (facilities, total) = self.facility_repo.list(page, page_size).await?;
        Ok(FacilityPage {
            facilities,
            total,
            page,
            page_size,
        })
    }

    pub async fn update(
        &self,
        id: i64,
        changes: FacilityUpdate,
    ) -> Result<Facility, FacilityError> {
        let changes = FacilityUpdate {
            name: changes
                .name
                .as_deref()
                .map(|n| row_validator::valid_name(Some(n)))
                .transpose()?,
            address: changes
                .address
                .as_deref()
                .map(|a| row_validator::valid_address(Some(a)))
                .transpose()?,
            phone: changes
                .phone
                .as_deref()
                .map(|p| row_validator::valid_phone(Some(p)))
                .transpose()?
                .flatten(),
        };
        if changes.is_empty() {
            return self.get(id).await;
        }
        self.facility_repo
            .update(id, &changes)
            .await?
            .ok_or(FacilityError::NotFound(id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), FacilityError> {
        if !self.facility_repo.delete(id).await? {
            return Err(FacilityError::NotFound(id));
        }
        Ok(())
    }
}
