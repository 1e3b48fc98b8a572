//! App setting domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::Entity;

/// Interpretation hint for a setting value.
///
/// The hint is not validated against the stored payload; format
/// interpretation is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
    Number,
    Boolean,
    Json,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::String => "string",
            SettingType::Number => "number",
            SettingType::Boolean => "boolean",
            SettingType::Json => "json",
        }
    }
}

impl std::fmt::Display for SettingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingType::String),
            "number" => Ok(SettingType::Number),
            "boolean" => Ok(SettingType::Boolean),
            "json" => Ok(SettingType::Json),
            other => Err(format!("unknown setting type: {other}")),
        }
    }
}

/// A named key/value configuration record.
///
/// The business key is the caller-meaningful identity; the surrogate id is
/// assigned by the entity store at commit time.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSetting {
    pub id: i32,
    pub key: String,
    pub value: String,
    pub setting_type: SettingType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppSetting {
    /// Builds a new record with both audit timestamps set to now.
    pub fn new(
        key: String,
        value: String,
        setting_type: SettingType,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            key,
            value,
            setting_type,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes the last-update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for AppSetting {
    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Transfer shape produced at the HTTP boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettingView {
    pub id: i32,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AppSetting> for AppSettingView {
    fn from(entity: &AppSetting) -> Self {
        Self {
            id: entity.id,
            key: entity.key.clone(),
            value: entity.value.clone(),
            setting_type: entity.setting_type,
            description: entity.description.clone(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Request to create an app setting. Id and timestamps are store-assigned.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppSettingRequest {
    #[validate(length(min = 1))]
    pub key: String,

    #[validate(length(min = 1))]
    pub value: String,

    #[serde(rename = "type")]
    pub setting_type: SettingType,

    pub description: Option<String>,
}

/// Request to update an app setting.
///
/// `type` is optional; omitting it preserves the stored hint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppSettingRequest {
    #[validate(length(min = 1))]
    pub key: String,

    #[validate(length(min = 1))]
    pub value: String,

    #[serde(rename = "type", default)]
    pub setting_type: Option<SettingType>,

    pub description: Option<String>,
}
