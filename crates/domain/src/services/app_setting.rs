//! App setting service.

use std::sync::Arc;

use crate::cache::ReadCache;
use crate::errors::{check_fields, DomainError};
use crate::models::{
    AppSetting, AppSettingView, CreateAppSettingRequest, UpdateAppSettingRequest,
};
use crate::store::{EntityStore, StoreError};

const APP_SETTING: &str = "App Setting";

#[derive(Clone)]
pub struct AppSettingService {
    store: Arc<dyn EntityStore<AppSetting>>,
    cache: ReadCache<AppSettingView>,
}

impl AppSettingService {
    pub fn new(store: Arc<dyn EntityStore<AppSetting>>, cache: ReadCache<AppSettingView>) -> Self {
        Self { store, cache }
    }

    /// Lists every setting. Always fresh; the list is never cached.
    pub async fn get_all(&self) -> Result<Vec<AppSettingView>, DomainError> {
        let entities = self.store.get_all().await?;
        Ok(entities.iter().map(AppSettingView::from).collect())
    }

    /// Looks a setting up by business key through the cache-aside layer.
    pub async fn get_by_key(&self, key: &str) -> Result<AppSettingView, DomainError> {
        let store = Arc::clone(&self.store);
        let view = self
            .cache
            .get_or_load(key, move || async move {
                let entity = store
                    .find_one(&|setting: &AppSetting| setting.key == key)
                    .await?;
                Ok::<_, DomainError>(entity.as_ref().map(AppSettingView::from))
            })
            .await?;
        view.ok_or(DomainError::NotFound(APP_SETTING))
    }

    /// Creates a setting after checking key uniqueness.
    ///
    /// The cache is not written; the first read populates it.
    pub async fn create(
        &self,
        request: CreateAppSettingRequest,
    ) -> Result<AppSettingView, DomainError> {
        check_fields(&request)?;

        let key = request.key.clone();
        if self
            .store
            .is_exists(&move |setting: &AppSetting| setting.key == key)
            .await?
        {
            return Err(DomainError::AlreadyExists(APP_SETTING, "key"));
        }

        let session = self.store.begin();
        session.add(AppSetting::new(
            request.key,
            request.value,
            request.setting_type,
            request.description,
        ));
        let entity = session
            .save_changes()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("commit returned no inserted entity".into()))?;

        Ok(AppSettingView::from(&entity))
    }

    /// Updates the setting with the given id.
    ///
    /// The pre-update key is invalidated after the commit: that is what a
    /// concurrent reader's cache entry is keyed on.
    pub async fn update(
        &self,
        id: i32,
        request: UpdateAppSettingRequest,
    ) -> Result<(), DomainError> {
        check_fields(&request)?;

        let key = request.key.clone();
        if self
            .store
            .is_exists(&move |setting: &AppSetting| setting.key == key && setting.id != id)
            .await?
        {
            return Err(DomainError::AlreadyExists(APP_SETTING, "key"));
        }

        let mut entity = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(APP_SETTING))?;

        let old_key = entity.key.clone();
        entity.key = request.key;
        entity.value = request.value;
        if let Some(setting_type) = request.setting_type {
            entity.setting_type = setting_type;
        }
        entity.description = request.description;
        entity.touch();

        let session = self.store.begin();
        session.update(entity);
        session.save_changes().await?;

        self.cache.invalidate(&old_key).await;
        Ok(())
    }

    /// Deletes the setting with the given id. Hard delete.
    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let entity = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(APP_SETTING))?;

        let key = entity.key.clone();
        let session = self.store.begin();
        session.remove(entity);
        session.save_changes().await?;

        self.cache.invalidate(&key).await;
        Ok(())
    }
}
