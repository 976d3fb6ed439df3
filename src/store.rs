use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::task::{Task, TaskId, TaskList};
use crate::view::{ViewQuery, view};

/// Slot key used when none is configured.
pub const DEFAULT_SLOT: &str = "todos";

/// Owns the base task list and the storage slot it is persisted to.
///
/// Every mutation is written to the slot before it becomes visible in memory;
/// nothing else touches the slot.
pub struct TaskStore<S: Storage> {
    storage: S,
    slot: String,
    list: TaskList,
}

impl<S: Storage> TaskStore<S> {
    /// Open the store, loading whatever the slot currently holds.
    pub fn open(storage: S, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let list = read_slot(&storage, &slot);
        debug!(slot = %slot, tasks = list.len(), "task store opened");
        Self {
            storage,
            slot,
            list,
        }
    }

    /// Read the slot. Missing, unreadable or corrupted data yields an empty list.
    pub fn load(&self) -> TaskList {
        read_slot(&self.storage, &self.slot)
    }

    /// Write the in-memory list to the slot, overwriting its prior value.
    pub fn persist(&self) -> Result<()> {
        let content = codec::encode(&self.list)?;
        self.storage.set(&self.slot, &content)
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Add a task. Blank text is ignored and returns `Ok(None)` without
    /// touching storage.
    pub fn add(&mut self, text: &str, due_date: Option<NaiveDate>) -> Result<Option<TaskId>> {
        if text.trim().is_empty() {
            debug!("ignoring blank task text");
            return Ok(None);
        }
        let mut next = self.list.clone();
        let id = next.add(text, due_date).ok_or(Error::IdsExhausted)?;
        self.commit(next)?;
        info!(%id, "task added");
        Ok(Some(id))
    }

    /// Flip completion on a task, returning its new state.
    pub fn toggle(&mut self, id: TaskId) -> Result<bool> {
        let mut next = self.list.clone();
        let completed = next.toggle(id).ok_or(Error::TaskNotFound(id))?;
        self.commit(next)?;
        info!(%id, completed, "task toggled");
        Ok(completed)
    }

    /// Remove a task, returning it.
    pub fn delete(&mut self, id: TaskId) -> Result<Task> {
        let mut next = self.list.clone();
        let task = next.delete(id).ok_or(Error::TaskNotFound(id))?;
        self.commit(next)?;
        info!(%id, "task deleted");
        Ok(task)
    }

    /// Write `next` to the slot and only then make it the in-memory list, so
    /// a failed write leaves both sides at the previous state.
    fn commit(&mut self, next: TaskList) -> Result<()> {
        let content = codec::encode(&next)?;
        self.storage.set(&self.slot, &content)?;
        self.list = next;
        Ok(())
    }

    /// The display projection for `query`, recomputed on each call.
    pub fn view(&self, query: &ViewQuery) -> Vec<&Task> {
        view(self.list.tasks(), query)
    }
}

fn read_slot<S: Storage>(storage: &S, slot: &str) -> TaskList {
    let content = match storage.get(slot) {
        Ok(Some(content)) => content,
        Ok(None) => return TaskList::new(),
        Err(e) => {
            warn!("{e}, starting with an empty list");
            return TaskList::new();
        }
    };

    match codec::decode(&content) {
        Ok(list) => list,
        Err(e) => {
            warn!(slot, "corrupted task data: {e}, starting with an empty list");
            TaskList::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::task::parse_due_date;
    use crate::view::StatusFilter;

    /// Reads from an inner store, refuses every write.
    struct ReadOnlyStorage {
        inner: MemoryStorage,
    }

    impl Storage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("disk full".to_string()))
        }
    }

    fn read_only_store() -> TaskStore<ReadOnlyStorage> {
        let mut seed = TaskList::new();
        seed.add("a", None);
        seed.add("b", None);
        let content = codec::encode(&seed).unwrap();
        let inner = MemoryStorage::with_value(DEFAULT_SLOT, &content);
        TaskStore::open(ReadOnlyStorage { inner }, DEFAULT_SLOT)
    }

    fn store() -> TaskStore<MemoryStorage> {
        TaskStore::open(MemoryStorage::new(), DEFAULT_SLOT)
    }

    fn stored(store: &TaskStore<MemoryStorage>) -> Option<String> {
        store.storage().get(DEFAULT_SLOT).unwrap()
    }

    #[test]
    fn test_open_empty_slot() {
        let store = store();
        assert!(store.list().is_empty());
        assert!(stored(&store).is_none());
    }

    #[test]
    fn test_open_corrupted_slot_is_empty() {
        let storage = MemoryStorage::with_value(DEFAULT_SLOT, "{{{ not json");
        let store = TaskStore::open(storage, DEFAULT_SLOT);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_add_persists() {
        let mut store = store();
        let id = store
            .add("Buy milk", Some(parse_due_date("2024-01-10").unwrap()))
            .unwrap()
            .unwrap();
        assert_eq!(store.load(), *store.list());
        assert_eq!(store.load().get(id).unwrap().text, "Buy milk");
    }

    #[test]
    fn test_blank_add_does_not_write() {
        let mut store = store();
        assert!(store.add("   ", None).unwrap().is_none());
        assert!(stored(&store).is_none());
    }

    #[test]
    fn test_toggle_and_delete_persist() {
        let mut store = store();
        let a = store.add("a", None).unwrap().unwrap();
        let b = store.add("b", None).unwrap().unwrap();

        assert!(store.toggle(b).unwrap());
        assert!(store.load().get(b).unwrap().completed);

        let removed = store.delete(a).unwrap();
        assert_eq!(removed.text, "a");
        assert!(store.load().get(a).is_none());
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut store = store();
        store.add("a", None).unwrap();
        let before = stored(&store);

        let err = store.toggle(TaskId(9)).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(TaskId(9))));
        let err = store.delete(TaskId(9)).unwrap_err();
        assert!(err.to_string().contains("task 9 not found"));
        assert_eq!(stored(&store), before);
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let mut store = read_only_store();
        let before = store.list().clone();

        let err = store.add("c", None).unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(store.toggle(TaskId(1)).is_err());
        assert!(store.delete(TaskId(2)).is_err());

        assert_eq!(*store.list(), before);
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_add_when_ids_run_out() {
        let content = r#"{"nextId": 18446744073709551615, "tasks": []}"#;
        let storage = MemoryStorage::with_value(DEFAULT_SLOT, content);
        let mut store = TaskStore::open(storage, DEFAULT_SLOT);

        let err = store.add("a", None).unwrap_err();
        assert!(matches!(err, Error::IdsExhausted));
        assert!(store.list().is_empty());
        assert!(store.add("  ", None).unwrap().is_none());
    }

    #[test]
    fn test_open_with_largest_id_does_not_panic() {
        let content = r#"[{"id": 18446744073709551615, "text": "a"}]"#;
        let storage = MemoryStorage::with_value(DEFAULT_SLOT, content);
        let mut store = TaskStore::open(storage, DEFAULT_SLOT);
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list().tasks()[0].id, TaskId(1));
        assert_eq!(store.add("b", None).unwrap(), Some(TaskId(2)));
    }

    #[test]
    fn test_one_bad_record_keeps_the_rest() {
        let storage = MemoryStorage::with_value(
            DEFAULT_SLOT,
            r#"[{"text":"keep me","completed":false},{"text":"b","completed":null}]"#,
        );
        let store = TaskStore::open(storage, DEFAULT_SLOT);
        assert_eq!(store.list().len(), 2);
        assert!(!store.list().tasks()[1].completed);
    }

    #[test]
    fn test_persist_is_idempotent() {
        let mut store = store();
        store.add("a", None).unwrap();
        store.persist().unwrap();
        let first = stored(&store);
        store.persist().unwrap();
        assert_eq!(stored(&store), first);
    }

    #[test]
    fn test_reopen_sees_previous_state() {
        let mut first = store();
        first.add("a", None).unwrap();
        let content = stored(&first).unwrap();

        let second = TaskStore::open(MemoryStorage::with_value(DEFAULT_SLOT, &content), DEFAULT_SLOT);
        assert_eq!(second.list(), first.list());
    }

    #[test]
    fn test_view_uses_ids_from_projection() {
        let mut store = store();
        store.add("undated", None).unwrap();
        store
            .add("dated", Some(parse_due_date("2024-01-01").unwrap()))
            .unwrap();

        // First row of the sorted projection is the second task in the base list.
        let first_row = store.view(&ViewQuery::default())[0].id;
        store.toggle(first_row).unwrap();

        let done = store.view(&ViewQuery::new("", StatusFilter::Completed));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].text, "dated");
    }
}
