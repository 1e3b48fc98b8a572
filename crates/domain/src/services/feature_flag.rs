//! Feature flag service.

use std::sync::Arc;

use crate::cache::ReadCache;
use crate::errors::{check_fields, DomainError};
use crate::models::{
    CreateFeatureFlagRequest, FeatureFlag, FeatureFlagView, UpdateFeatureFlagRequest,
    UpdateFlagStatusRequest,
};
use crate::store::{EntityStore, StoreError};

const FEATURE_FLAG: &str = "Feature Flag";

#[derive(Clone)]
pub struct FeatureFlagService {
    store: Arc<dyn EntityStore<FeatureFlag>>,
    cache: ReadCache<FeatureFlagView>,
}

impl FeatureFlagService {
    pub fn new(store: Arc<dyn EntityStore<FeatureFlag>>, cache: ReadCache<FeatureFlagView>) -> Self {
        Self { store, cache }
    }

    /// Lists every flag. Always fresh; the list is never cached.
    pub async fn get_all(&self) -> Result<Vec<FeatureFlagView>, DomainError> {
        let entities = self.store.get_all().await?;
        Ok(entities.iter().map(FeatureFlagView::from).collect())
    }

    /// Looks a flag up by name through the cache-aside layer.
    pub async fn get_by_name(&self, name: &str) -> Result<FeatureFlagView, DomainError> {
        let store = Arc::clone(&self.store);
        let view = self
            .cache
            .get_or_load(name, move || async move {
                let entity = store.find_one(&|flag: &FeatureFlag| flag.name == name).await?;
                Ok::<_, DomainError>(entity.as_ref().map(FeatureFlagView::from))
            })
            .await?;
        view.ok_or(DomainError::NotFound(FEATURE_FLAG))
    }

    /// Creates a flag after checking name uniqueness. New flags are always
    /// disabled regardless of what the caller intends to toggle later.
    pub async fn create(
        &self,
        request: CreateFeatureFlagRequest,
    ) -> Result<FeatureFlagView, DomainError> {
        check_fields(&request)?;

        let name = request.name.clone();
        if self
            .store
            .is_exists(&move |flag: &FeatureFlag| flag.name == name)
            .await?
        {
            return Err(DomainError::AlreadyExists(FEATURE_FLAG, "name"));
        }

        let session = self.store.begin();
        session.add(FeatureFlag::new(request.name, request.description));
        let entity = session
            .save_changes()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("commit returned no inserted entity".into()))?;

        Ok(FeatureFlagView::from(&entity))
    }

    /// Updates a flag's name and description. The enabled state is left
    /// alone; the status operation owns it.
    pub async fn update(
        &self,
        id: i32,
        request: UpdateFeatureFlagRequest,
    ) -> Result<(), DomainError> {
        check_fields(&request)?;

        let name = request.name.clone();
        if self
            .store
            .is_exists(&move |flag: &FeatureFlag| flag.name == name && flag.id != id)
            .await?
        {
            return Err(DomainError::AlreadyExists(FEATURE_FLAG, "name"));
        }

        let mut entity = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(FEATURE_FLAG))?;

        let old_name = entity.name.clone();
        entity.name = request.name;
        entity.description = request.description;
        entity.touch();

        let session = self.store.begin();
        session.update(entity);
        session.save_changes().await?;

        self.cache.invalidate(&old_name).await;
        Ok(())
    }

    /// Toggles the enabled state of the flag with the given name, leaving
    /// name and description untouched.
    pub async fn update_status(
        &self,
        name: &str,
        request: UpdateFlagStatusRequest,
    ) -> Result<(), DomainError> {
        let mut entity = self
            .store
            .find_one(&|flag: &FeatureFlag| flag.name == name)
            .await?
            .ok_or(DomainError::NotFound(FEATURE_FLAG))?;

        entity.enabled = request.enabled;
        entity.touch();

        let session = self.store.begin();
        session.update(entity);
        session.save_changes().await?;

        self.cache.invalidate(name).await;
        Ok(())
    }

    /// Deletes the flag with the given id. Hard delete.
    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let entity = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(FEATURE_FLAG))?;

        let name = entity.name.clone();
        let session = self.store.begin();
        session.remove(entity);
        session.save_changes().await?;

        self.cache.invalidate(&name).await;
        Ok(())
    }
}
