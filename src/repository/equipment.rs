//! Postgres-backed registry store

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use super::LedgerStore;
use crate::{
    error::{AppError, AppResult},
    models::equipment::{EquipmentRecord, OwnerId},
    registry::{Commit, LedgerSnapshot},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all equipment rows
    async fn list_records(&self) -> AppResult<Vec<EquipmentRecord>> {
        let rows = sqlx::query_as::<_, EquipmentRecord>(
            r#"
            SELECT id, owner, equipment_type, model, serial_number,
                   installation_date, warranty_expiry, last_service_date
            FROM equipment ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_owner_counts(&self) -> AppResult<Vec<(OwnerId, i64)>> {
        let rows = sqlx::query_as::<_, (OwnerId, i64)>(
            "SELECT owner, equipment_count FROM owner_equipment_counts ORDER BY owner",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_next_id(&self) -> AppResult<i64> {
        let value: Option<i64> =
            sqlx::query_scalar("SELECT value FROM registry_counters WHERE name = 'next_id'")
                .fetch_optional(&self.pool)
                .await?;
        Ok(value.unwrap_or(1))
    }
}

async fn upsert_owner_count(
    tx: &mut Transaction<'_, Postgres>,
    owner: &OwnerId,
    count: i64,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO owner_equipment_counts (owner, equipment_count)
        VALUES ($1, $2)
        ON CONFLICT (owner) DO UPDATE SET equipment_count = EXCLUDED.equipment_count
        "#,
    )
    .bind(owner)
    .bind(count)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl LedgerStore for EquipmentRepository {
    async fn load(&self) -> AppResult<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            records: self.list_records().await?,
            owner_counts: self.list_owner_counts().await?,
            next_id: self.get_next_id().await?,
        })
    }

    async fn commit(&self, commit: &Commit) -> AppResult<()> {
        let record = &commit.record;
        let mut tx = self.pool.begin().await?;

        if commit.inserts_record {
            // A taken id fails the primary key instead of overwriting the record
            sqlx::query(
                r#"
                INSERT INTO equipment (id, owner, equipment_type, model, serial_number,
                                       installation_date, warranty_expiry, last_service_date)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(record.id)
            .bind(&record.owner)
            .bind(&record.equipment_type)
            .bind(&record.model)
            .bind(&record.serial_number)
            .bind(record.installation_date)
            .bind(record.warranty_expiry)
            .bind(record.last_service_date)
            .execute(&mut *tx)
            .await?;
        } else {
            let result = sqlx::query(
                r#"
                UPDATE equipment SET
                    owner = $2,
                    equipment_type = $3,
                    model = $4,
                    serial_number = $5,
                    installation_date = $6,
                    warranty_expiry = $7,
                    last_service_date = $8
                WHERE id = $1
                "#,
            )
            .bind(record.id)
            .bind(&record.owner)
            .bind(&record.equipment_type)
            .bind(&record.model)
            .bind(&record.serial_number)
            .bind(record.installation_date)
            .bind(record.warranty_expiry)
            .bind(record.last_service_date)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() != 1 {
                return Err(AppError::Internal(format!(
                    "Equipment {} is not stored",
                    record.id
                )));
            }
        }

        for (owner, count) in &commit.owner_counts {
            upsert_owner_count(&mut tx, owner, *count).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO registry_counters (name, value) VALUES ('next_id', $1)
            ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(commit.next_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn repair_counts(&self, counts: &[(OwnerId, i64)]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        for (owner, count) in counts {
            upsert_owner_count(&mut tx, owner, *count).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
