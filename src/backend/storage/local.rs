// src/backend/storage/local.rs
use crate::error::HealthError;
use crate::storage::memory::{get_local_storage_memory, Memory};
use ic_stable_structures::StableBTreeMap;
use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Full record sequence, JSON array.
pub const RECORDS_KEY: &str = "healthchain_records";
/// Signed-in user, JSON object.
pub const USER_KEY: &str = "healthchain_user";
/// Last record id handed out. Outlives logout so ids are never reused.
pub const RECORD_SEQ_KEY: &str = "healthchain_record_seq";

/// Persisted key/value area holding JSON text, the stable-memory analogue of
/// browser local storage.
pub struct LocalStorage<M: ic_stable_structures::Memory> {
    items: StableBTreeMap<String, String, M>,
}

/// Single-threaded shared handle; the record store and the session both hold one.
pub type SharedStorage<M> = Rc<RefCell<LocalStorage<M>>>;

impl<M: ic_stable_structures::Memory> LocalStorage<M> {
    /// Opens the storage, picking up whatever was previously written to `memory`.
    pub fn init(memory: M) -> Self {
        LocalStorage {
            items: StableBTreeMap::init(memory),
        }
    }

    pub fn shared(memory: M) -> SharedStorage<M> {
        Rc::new(RefCell::new(LocalStorage::init(memory)))
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(&key.to_string())
    }

    pub fn set_item(&mut self, key: &str, value: String) {
        self.items.insert(key.to_string(), value);
    }

    pub fn remove_item(&mut self, key: &str) -> Option<String> {
        self.items.remove(&key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(&key.to_string())
    }

    pub fn len(&self) -> u64 {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reads and parses a JSON value. Missing keys are `Ok(None)`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, HealthError> {
        match self.get_item(key) {
            Some(text) => serde_json::from_str(&text).map(Some).map_err(|e| {
                HealthError::SerializationError(format!("Failed to parse '{}': {}", key, e))
            }),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), HealthError> {
        let text = serde_json::to_string(value).map_err(|e| {
            HealthError::SerializationError(format!("Failed to serialize '{}': {}", key, e))
        })?;
        self.set_item(key, text);
        Ok(())
    }
}

thread_local! {
    /// Local storage over the canister's stable memory.
    static LOCAL_STORAGE: SharedStorage<Memory> = LocalStorage::shared(get_local_storage_memory());
}

/// Handle to the process-wide local storage.
pub fn default_local_storage() -> SharedStorage<Memory> {
    LOCAL_STORAGE.with(Rc::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_stable_structures::DefaultMemoryImpl;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn json_values_round_trip_and_missing_keys_are_none() {
        let mut storage = LocalStorage::init(DefaultMemoryImpl::default());
        assert_eq!(storage.get_json::<Probe>("probe").unwrap(), None);

        storage.set_json("probe", &Probe { value: 3 }).unwrap();
        assert_eq!(storage.get_json::<Probe>("probe").unwrap(), Some(Probe { value: 3 }));
        assert_eq!(storage.get_item("probe").as_deref(), Some(r#"{"value":3}"#));
    }

    #[test]
    fn corrupt_json_is_a_serialization_error() {
        let mut storage = LocalStorage::init(DefaultMemoryImpl::default());
        storage.set_item("probe", "{not json".to_string());
        let err = storage.get_json::<Probe>("probe").unwrap_err();
        assert!(matches!(err, HealthError::SerializationError(_)));
    }

    #[test]
    fn reopening_the_same_memory_sees_previous_writes() {
        let memory = DefaultMemoryImpl::default();
        {
            let mut storage = LocalStorage::init(memory.clone());
            storage.set_item(USER_KEY, r#"{"username":"alice"}"#.to_string());
        }
        let reopened = LocalStorage::init(memory);
        assert!(reopened.contains(USER_KEY));
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn remove_item_returns_previous_value() {
        let mut storage = LocalStorage::init(DefaultMemoryImpl::default());
        storage.set_item(RECORDS_KEY, "[]".to_string());
        assert_eq!(storage.remove_item(RECORDS_KEY).as_deref(), Some("[]"));
        assert!(storage.is_empty());
    }
}
