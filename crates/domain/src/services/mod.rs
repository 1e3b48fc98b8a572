//! Services orchestrating the entity store, the read cache and the error
//! taxonomy.
//!
//! Both services follow the same shape: reads by business key go through
//! the cache-aside layer, list reads bypass it, and every write commits to
//! the store first and invalidates the affected cache key only after the
//! commit succeeded.

pub mod app_setting;
pub mod feature_flag;

pub use app_setting::AppSettingService;
pub use feature_flag::FeatureFlagService;
