//! Postgres-backed app setting store.

use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::AppSetting;
use domain::store::{ChangeOp, EntityStore, Predicate, StoreError};

use super::backend;
use crate::entities::AppSettingRow;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, key, value, setting_type, description, created_at, updated_at";

pub struct PgAppSettingStore {
    pool: PgPool,
    staged: Mutex<Vec<ChangeOp<AppSetting>>>,
}

impl PgAppSettingStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            staged: Mutex::new(Vec::new()),
        }
    }

    fn stage(&self, op: ChangeOp<AppSetting>) {
        self.staged.lock().expect("staged ops lock poisoned").push(op);
    }

    async fn load_all(&self) -> Result<Vec<AppSetting>, StoreError> {
        let timer = QueryTimer::new("app_settings_load_all");
        let rows = sqlx::query_as::<_, AppSettingRow>(&format!(
            "SELECT {COLUMNS} FROM app_settings"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        timer.record();

        rows.into_iter().map(AppSetting::try_from).collect()
    }
}

#[async_trait]
impl EntityStore<AppSetting> for PgAppSettingStore {
    async fn get_all(&self) -> Result<Vec<AppSetting>, StoreError> {
        self.load_all().await
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<AppSetting>, StoreError> {
        let timer = QueryTimer::new("app_settings_get_by_id");
        let row = sqlx::query_as::<_, AppSettingRow>(&format!(
            "SELECT {COLUMNS} FROM app_settings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        timer.record();

        row.map(AppSetting::try_from).transpose()
    }

    async fn find_one(
        &self,
        predicate: Predicate<'_, AppSetting>,
    ) -> Result<Option<AppSetting>, StoreError> {
        let settings = self.load_all().await?;
        Ok(settings.into_iter().find(|setting| predicate(setting)))
    }

    async fn find(
        &self,
        predicate: Predicate<'_, AppSetting>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<AppSetting>, StoreError> {
        let settings = self.load_all().await?;
        Ok(settings
            .into_iter()
            .filter(|setting| predicate(setting))
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn is_exists(&self, predicate: Predicate<'_, AppSetting>) -> Result<bool, StoreError> {
        let settings = self.load_all().await?;
        Ok(settings.iter().any(|setting| predicate(setting)))
    }

    fn add(&self, entity: AppSetting) {
        self.stage(ChangeOp::Insert(entity));
    }

    fn add_range(&self, entities: Vec<AppSetting>) {
        for entity in entities {
            self.stage(ChangeOp::Insert(entity));
        }
    }

    fn update(&self, entity: AppSetting) {
        self.stage(ChangeOp::Update(entity));
    }

    fn remove(&self, entity: AppSetting) {
        self.stage(ChangeOp::Remove(entity.id));
    }

    fn remove_range(&self, entities: Vec<AppSetting>) {
        for entity in entities {
            self.stage(ChangeOp::Remove(entity.id));
        }
    }

    async fn save_changes(&self) -> Result<Vec<AppSetting>, StoreError> {
        let ops: Vec<ChangeOp<AppSetting>> = {
            let mut staged = self.staged.lock().expect("staged ops lock poisoned");
            staged.drain(..).collect()
        };

        let timer = QueryTimer::new("app_settings_save_changes");
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let mut inserted = Vec::new();

        for op in ops {
            match op {
                ChangeOp::Insert(entity) => {
                    let row = sqlx::query_as::<_, AppSettingRow>(&format!(
                        "INSERT INTO app_settings (key, value, setting_type, description, created_at, updated_at) \
                         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
                    ))
                    .bind(&entity.key)
                    .bind(&entity.value)
                    .bind(entity.setting_type.as_str())
                    .bind(&entity.description)
                    .bind(entity.created_at)
                    .bind(entity.updated_at)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(backend)?;
                    inserted.push(AppSetting::try_from(row)?);
                }
                ChangeOp::Update(entity) => {
                    let result = sqlx::query(
                        "UPDATE app_settings SET key = $2, value = $3, setting_type = $4, \
                         description = $5, updated_at = $6 WHERE id = $1",
                    )
                    .bind(entity.id)
                    .bind(&entity.key)
                    .bind(&entity.value)
                    .bind(entity.setting_type.as_str())
                    .bind(&entity.description)
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
                    let result = sqlx::query("DELETE FROM app_settings WHERE id = $1")
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

    fn begin(&self) -> Box<dyn EntityStore<AppSetting>> {
        Box::new(PgAppSettingStore::new(self.pool.clone()))
    }
}
