//! Postgres-backed feature flag store.

use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::FeatureFlag;
use domain::store::{ChangeOp, EntityStore, Predicate, StoreError};

use super::backend;
use crate::entities::FeatureFlagRow;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, name, description, enabled, created_at, updated_at";

pub struct PgFeatureFlagStore {
    pool: PgPool,
    staged: Mutex<Vec<ChangeOp<FeatureFlag>>>,
}

impl PgFeatureFlagStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            staged: Mutex::new(Vec::new()),
        }
    }

    fn stage(&self, op: ChangeOp<FeatureFlag>) {
        self.staged.lock().expect("staged ops lock poisoned").push(op);
    }

    async fn load_all(&self) -> Result<Vec<FeatureFlag>, StoreError> {
        let timer = QueryTimer::new("feature_flags_load_all");
        let rows = sqlx::query_as::<_, FeatureFlagRow>(&format!(
            "SELECT {COLUMNS} FROM feature_flags"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        timer.record();

        Ok(rows.into_iter().map(FeatureFlag::from).collect())
    }
}

#[async_trait]
impl EntityStore<FeatureFlag> for PgFeatureFlagStore {
    async fn get_all(&self) -> Result<Vec<FeatureFlag>, StoreError> {
        self.load_all().await
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<FeatureFlag>, StoreError> {
        let timer = QueryTimer::new("feature_flags_get_by_id");
        let row = sqlx::query_as::<_, FeatureFlagRow>(&format!(
            "SELECT {COLUMNS} FROM feature_flags WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        timer.record();

        Ok(row.map(FeatureFlag::from))
    }

    async fn find_one(
        &self,
        predicate: Predicate<'_, FeatureFlag>,
    ) -> Result<Option<FeatureFlag>, StoreError> {
        let flags = self.load_all().await?;
        Ok(flags.into_iter().find(|flag| predicate(flag)))
    }

    async fn find(
        &self,
        predicate: Predicate<'_, FeatureFlag>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<FeatureFlag>, StoreError> {
        let flags = self.load_all().await?;
        Ok(flags
            .into_iter()
            .filter(|flag| predicate(flag))
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn is_exists(&self, predicate: Predicate<'_, FeatureFlag>) -> Result<bool, StoreError> {
        let flags = self.load_all().await?;
        Ok(flags.iter().any(|flag| predicate(flag)))
    }

    fn add(&self, entity: FeatureFlag) {
        self.stage(ChangeOp::Insert(entity));
    }

    fn add_range(&self, entities: Vec<FeatureFlag>) {
        for entity in entities {
            self.stage(ChangeOp::Insert(entity));
        }
    }

    fn update(&self, entity: FeatureFlag) {
        self.stage(ChangeOp::Update(entity));
    }

    fn remove(&self, entity: FeatureFlag) {
        self.stage(ChangeOp::Remove(entity.id));
    }

    fn remove_range(&self, entities: Vec<FeatureFlag>) {
        for entity in entities {
            self.stage(ChangeOp::Remove(entity.id));
        }
    }

    async fn save_changes(&self) -> Result<Vec<FeatureFlag>, StoreError> {
        let ops: Vec<ChangeOp<FeatureFlag>> = {
            let mut staged = self.staged.lock().expect("staged ops lock poisoned");
            staged.drain(..).collect()
        };

        let timer = QueryTimer::new("feature_flags_save_changes");
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let mut inserted = Vec::new();

        for op in ops {
            match op {
                ChangeOp::Insert(entity) => {
                    let row = sqlx::query_as::<_, FeatureFlagRow>(&format!(
                        "INSERT INTO feature_flags (name, description, enabled, created_at, updated_at) \
                         VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
                    ))
                    .bind(&entity.name)
                    .bind(&entity.description)
                    .bind(entity.enabled)
                    .bind(entity.created_at)
                    .bind(entity.updated_at)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(backend)?;
                    inserted.push(FeatureFlag::from(row));
                }
                ChangeOp::Update(entity) => {
                    let result = sqlx::query(
                        "UPDATE feature_flags SET name = $2, description = $3, enabled = $4, \
                         updated_at = $5 WHERE id = $1",
                    )
                    .bind(entity.id)
                    .bind(&entity.name)
                    .bind(&entity.description)
                    .bind(entity.enabled)
                    .bind(entity.updated_at)
                    .execute(&mut *tx)
                    .await
                    .map_err(backend)?;
                    if result.rows_affected() == 0 {
                        // Dropping the transaction rolls back the batch.
                        return Err(StoreError::Stale(entity.id));
                    }
                }
                ChangeOp::Remove(id) => {
                    let result = sqlx::query("DELETE FROM feature_flags WHERE id = $1")
                        .bind(id)
                        .execute(&mut *tx)
                        .await
                        .map_err(backend)?;
                    if result.rows_affected() == 0 {
                        return Err(StoreError::Stale(id));
                    }
                }
            }
        }

        tx.commit().await.map_err(backend)?;
        timer.record();
        Ok(inserted)
    }

    fn begin(&self) -> Box<dyn EntityStore<FeatureFlag>> {
        Box::new(PgFeatureFlagStore::new(self.pool.clone()))
    }
}
