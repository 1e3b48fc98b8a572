//! Postgres implementations of the entity store contract.
//!
//! Each store shares the change-staging model of the contract: mutations
//! accumulate in a per-session buffer and `save_changes` drains them into
//! a single transaction. Predicate reads materialize the table and apply
//! the closure in process; the config tables stay small by nature, and the
//! contract deliberately avoids translating closures into SQL.

pub mod app_setting;
pub mod feature_flag;

pub use app_setting::PgAppSettingStore;
pub use feature_flag::PgFeatureFlagStore;

use domain::store::StoreError;

pub(crate) fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
