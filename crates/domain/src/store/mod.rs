//! Generic entity store contract.
//!
//! The store follows a staged-mutation model: `add`/`update`/`remove` only
//! record intent, and [`EntityStore::save_changes`] commits everything
//! staged as one atomic transaction. [`EntityStore::begin`] opens a fresh
//! unit of work over the same durable backing, giving each request its own
//! transaction scope.
//!
//! Predicates are plain closures over entity fields; backends apply them
//! in process rather than translating them into a query language.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Default page size for predicate queries.
pub const DEFAULT_FIND_LIMIT: usize = 100;

/// Boolean filter over entity fields.
pub type Predicate<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// Failures raised by entity store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected or failed an operation.
    #[error("entity store error: {0}")]
    Backend(String),

    /// A staged update or removal referenced an id that no longer exists.
    /// The commit is rolled back and nothing staged is applied.
    #[error("entity with id {0} no longer exists")]
    Stale(i32),
}

/// A persisted record with a surrogate identifier and audit timestamps.
///
/// The identifier is assigned by the store at commit time and immutable
/// afterwards; `created_at` is set once at insert, `updated_at` at insert
/// and at every successful mutation.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}

/// A staged change awaiting commit.
#[derive(Debug, Clone)]
pub enum ChangeOp<T> {
    Insert(T),
    Update(T),
    Remove(i32),
}

/// Typed persistence abstraction over a collection of records.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Returns every record. No ordering guarantee.
    async fn get_all(&self) -> Result<Vec<T>, StoreError>;

    /// Returns the record with the given surrogate id, if any.
    async fn get_by_id(&self, id: i32) -> Result<Option<T>, StoreError>;

    /// Returns the first record matching the predicate, if any.
    async fn find_one(&self, predicate: Predicate<'_, T>) -> Result<Option<T>, StoreError>;

    /// Returns matching records after skipping `offset`, up to `limit`.
    ///
    /// The predicate is applied before paging. Callers must not assume a
    /// stable order across calls; none is defined.
    async fn find(
        &self,
        predicate: Predicate<'_, T>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<T>, StoreError>;

    /// Existence check without materializing the record.
    async fn is_exists(&self, predicate: Predicate<'_, T>) -> Result<bool, StoreError>;

    /// Stages an insert. The id is assigned at commit time.
    fn add(&self, entity: T);

    /// Stages inserts for a batch of entities.
    fn add_range(&self, entities: Vec<T>);

    /// Stages an update of an existing record.
    fn update(&self, entity: T);

    /// Stages a removal. Hard delete; there are no tombstones.
    fn remove(&self, entity: T);

    /// Stages removals for a batch of entities.
    fn remove_range(&self, entities: Vec<T>);

    /// Commits all staged changes atomically. On failure nothing is
    /// applied. Returns the inserted entities with their assigned ids.
    async fn save_changes(&self) -> Result<Vec<T>, StoreError>;

    /// Opens a fresh unit of work over the same durable backing.
    fn begin(&self) -> Box<dyn EntityStore<T>>;
}
