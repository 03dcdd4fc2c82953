use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::facility::{Facility, FacilityUpdate, NewFacility};
use crate::domain::repository::facility_repository::FacilityRepository;

pub struct FacilityRepositoryImpl {
    pool: PgPool,
}

impl FacilityRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FacilityRow {
    id: i64,
    name: String,
    address: String,
    phone: Option<String>,
    batch_id: Uuid,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FacilityRow> for Facility {
    fn from(row: FacilityRow) -> Self {
        Facility {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            batch_id: row.batch_id,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const INSERT_SQL: &str = r#"
    INSERT INTO facility_registry.facilities (name, address, phone, batch_id)
    VALUES ($1, $2, $3, $4)
    RETURNING id, name, address, phone, batch_id, active, created_at, updated_at
"#;

#[async_trait]
impl FacilityRepository for FacilityRepositoryImpl {
    async fn insert_one(&self, batch_id: Uuid, input: &NewFacility) -> anyhow::Result<Facility> {
        let row = sqlx::query_as::<_, FacilityRow>(INSERT_SQL)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(batch_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn insert_all(
        &self,
        batch_id: Uuid,
        inputs: &[NewFacility],
    ) -> anyhow::Result<Vec<Facility>> {
        let mut tx = self.pool.begin().await?;
        let mut facilities = Vec::with_capacity(inputs.len());
        for input in inputs {
            let row = sqlx::query_as::<_, FacilityRow>(INSERT_SQL)
                .bind(&input.name)
                .bind(&input.address)
                .bind(&input.phone)
                .bind(batch_id)
                .fetch_one(&mut *tx)
                .await?;
            facilities.push(row.into());
        }
        tx.commit().await?;
        Ok(facilities)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Facility>> {
        let row = sqlx::query_as::<_, FacilityRow>(
            r#"
            SELECT id, name, address, phone, batch_id, active, created_at, updated_at
            FROM facility_registry.facilities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_batch(&self, batch_id: Uuid) -> anyhow::Result<Vec<Facility>> {
        let rows = sqlx::query_as::<_, FacilityRow>(
            r#"
            SELECT id, name, address, phone, batch_id, active, created_at, updated_at
            FROM facility_registry.facilities
            WHERE batch_id = $1
            ORDER BY id
            "#,
        )
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list(&self, page: i64, page_size: i64) -> anyhow::Result<(Vec<Facility>, i64)> {
        let offset = (page - 1).max(0) * page_size;
        let rows = sqlx::query_as::<_, FacilityRow>(
            r#"
            SELECT id, name, address, phone, batch_id, active, created_at, updated_at
            FROM facility_registry.facilities
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM facility_registry.facilities")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total.0))
    }

    async fn update(&self, id: i64, changes: &FacilityUpdate) -> anyhow::Result<Option<Facility>> {
        let row = sqlx::query_as::<_, FacilityRow>(
            r#"
            UPDATE facility_registry.facilities
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, address, phone, batch_id, active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.address)
        .bind(&changes.phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM facility_registry.facilities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_active_by_batch(&self, batch_id: Uuid, active: bool) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE facility_registry.facilities
            SET active = $2, updated_at = now()
            WHERE batch_id = $1
            "#,
        )
        .bind(batch_id)
        .bind(active)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_batch(&self, batch_id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM facility_registry.facilities WHERE batch_id = $1")
            .bind(batch_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
