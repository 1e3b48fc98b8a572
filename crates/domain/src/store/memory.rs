//! In-memory entity store.
//!
//! Reference implementation of the store contract backed by a `BTreeMap`.
//! Tests substitute it for the Postgres stores without behavior change; it
//! also serves local development runs without a database.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use super::{ChangeOp, Entity, EntityStore, Predicate, StoreError};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

pub struct MemoryStore<T: Entity> {
    table: Arc<RwLock<Table<T>>>,
    staged: Mutex<Vec<ChangeOp<T>>>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::default())),
            staged: Mutex::new(Vec::new()),
        }
    }

    fn stage(&self, op: ChangeOp<T>) {
        self.staged.lock().expect("staged ops lock poisoned").push(op);
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for MemoryStore<T> {
    async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        let table = self.table.read().expect("table lock poisoned");
        Ok(table.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<T>, StoreError> {
        let table = self.table.read().expect("table lock poisoned");
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_one(&self, predicate: Predicate<'_, T>) -> Result<Option<T>, StoreError> {
        let table = self.table.read().expect("table lock poisoned");
        Ok(table.rows.values().find(|row| predicate(row)).cloned())
    }

    async fn find(
        &self,
        predicate: Predicate<'_, T>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<T>, StoreError> {
        let table = self.table.read().expect("table lock poisoned");
        Ok(table
            .rows
            .values()
            .filter(|row| predicate(row))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn is_exists(&self, predicate: Predicate<'_, T>) -> Result<bool, StoreError> {
        let table = self.table.read().expect("table lock poisoned");
        Ok(table.rows.values().any(|row| predicate(row)))
    }

    fn add(&self, entity: T) {
        self.stage(ChangeOp::Insert(entity));
    }

    fn add_range(&self, entities: Vec<T>) {
        for entity in entities {
            self.stage(ChangeOp::Insert(entity));
        }
    }

    fn update(&self, entity: T) {
        self.stage(ChangeOp::Update(entity));
    }

    fn remove(&self, entity: T) {
        self.stage(ChangeOp::Remove(entity.id()));
    }

    fn remove_range(&self, entities: Vec<T>) {
        for entity in entities {
            self.stage(ChangeOp::Remove(entity.id()));
        }
    }

    async fn save_changes(&self) -> Result<Vec<T>, StoreError> {
        let ops: Vec<ChangeOp<T>> = {
            let mut staged = self.staged.lock().expect("staged ops lock poisoned");
            staged.drain(..).collect()
        };

        let mut table = self.table.write().expect("table lock poisoned");

        // Validate the whole batch up front so a failing op applies nothing.
        for op in &ops {
            match op {
                ChangeOp::Update(entity) if !table.rows.contains_key(&entity.id()) => {
                    return Err(StoreError::Stale(entity.id()));
                }
                ChangeOp::Remove(id) if !table.rows.contains_key(id) => {
                    return Err(StoreError::Stale(*id));
                }
                _ => {}
            }
        }

        let mut inserted = Vec::new();
        for op in ops {
            match op {
                ChangeOp::Insert(mut entity) => {
                    let id = table.next_id;
                    table.next_id += 1;
                    entity.set_id(id);
                    table.rows.insert(id, entity.clone());
                    inserted.push(entity);
                }
                ChangeOp::Update(entity) => {
                    table.rows.insert(entity.id(), entity);
                }
                ChangeOp::Remove(id) => {
                    table.rows.remove(&id);
                }
            }
        }

        Ok(inserted)
    }

    fn begin(&self) -> Box<dyn EntityStore<T>> {
        Box::new(MemoryStore {
            table: Arc::clone(&self.table),
            staged: Mutex::new(Vec::new()),
        })
    }
}
