//! Domain models and transfer shapes.

pub mod app_setting;
pub mod feature_flag;

pub use app_setting::{
    AppSetting, AppSettingView, CreateAppSettingRequest, SettingType, UpdateAppSettingRequest,
};
pub use feature_flag::{
    CreateFeatureFlagRequest, FeatureFlag, FeatureFlagView, UpdateFeatureFlagRequest,
    UpdateFlagStatusRequest,
};
