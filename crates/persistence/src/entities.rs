//! Row entity definitions.
//!
//! Entities are direct mappings to database rows; conversions into domain
//! records live next to them so the stores stay free of column handling.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{AppSetting, FeatureFlag, SettingType};
use domain::store::StoreError;

/// App setting row.
#[derive(Debug, Clone, FromRow)]
pub struct AppSettingRow {
    pub id: i32,
    pub key: String,
    pub value: String,
    pub setting_type: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AppSettingRow> for AppSetting {
    type Error = StoreError;

    fn try_from(row: AppSettingRow) -> Result<Self, Self::Error> {
        let setting_type = row
            .setting_type
            .parse::<SettingType>()
            .map_err(StoreError::Backend)?;
        Ok(AppSetting {
            id: row.id,
            key: row.key,
            value: row.value,
            setting_type,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Feature flag row.
#[derive(Debug, Clone, FromRow)]
pub struct FeatureFlagRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeatureFlagRow> for FeatureFlag {
    fn from(row: FeatureFlagRow) -> Self {
        FeatureFlag {
            id: row.id,
            name: row.name,
            description: row.description,
            enabled: row.enabled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
