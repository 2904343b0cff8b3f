// src/backend/storage/records.rs
use crate::error::HealthError;
use crate::models::{NewRecord, Record, RecordId, SharingFlag};
use crate::storage::local::{SharedStorage, RECORDS_KEY, RECORD_SEQ_KEY};
use crate::utils::time::now_rfc3339;

/// Ordered record sequence persisted as one JSON array under `RECORDS_KEY`.
/// Every mutation rewrites the whole sequence.
pub struct RecordStore<M: ic_stable_structures::Memory> {
    storage: SharedStorage<M>,
}

impl<M: ic_stable_structures::Memory> RecordStore<M> {
    pub fn new(storage: SharedStorage<M>) -> Self {
        RecordStore { storage }
    }

    /// Creates a record with a fresh id and both sharing flags off, appends it and persists.
    pub fn add_record(&self, new: NewRecord) -> Result<Record, HealthError> {
        let mut records = self.load()?;
        let id = self.next_id(&records)?;

        let record = Record {
            id,
            owner: new.owner,
            name: new.name,
            category: new.category,
            date: new.date,
            size: new.size,
            notes: new.notes,
            payload_ref: new.payload_ref,
            shared_with_providers: false,
            shared_with_researchers: false,
            uploaded_at: now_rfc3339(),
        };
        records.push(record.clone());
        self.save(&records)?;

        crate::log_info!("Stored record {} ({} total)", id, records.len());
        Ok(record)
    }

    /// All records in insertion order.
    pub fn list_records(&self) -> Result<Vec<Record>, HealthError> {
        self.load()
    }

    pub fn get_record(&self, id: RecordId) -> Result<Option<Record>, HealthError> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    /// Replaces one sharing flag on one record. Fails with `RecordNotFound`
    /// without writing anything when the id is unknown.
    pub fn update_sharing_flag(
        &self,
        id: RecordId,
        flag: SharingFlag,
        value: bool,
    ) -> Result<Record, HealthError> {
        let mut records = self.load()?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(HealthError::RecordNotFound(id))?;
        record.set_flag(flag, value);
        let updated = record.clone();

        self.save(&records)?;
        crate::log_info!("Record {}: {} = {}", id, flag.key(), value);
        Ok(updated)
    }

    fn load(&self) -> Result<Vec<Record>, HealthError> {
        Ok(self
            .storage
            .borrow()
            .get_json::<Vec<Record>>(RECORDS_KEY)?
            .unwrap_or_default())
    }

    fn save(&self, records: &[Record]) -> Result<(), HealthError> {
        self.storage.borrow_mut().set_json(RECORDS_KEY, records)
    }

    /// Next id after both the persisted sequence counter and any id already stored.
    fn next_id(&self, records: &[Record]) -> Result<RecordId, HealthError> {
        let last_issued = self
            .storage
            .borrow()
            .get_json::<RecordId>(RECORD_SEQ_KEY)?
            .unwrap_or(0);
        let highest_stored = records.iter().map(|r| r.id).max().unwrap_or(0);
        let next = last_issued
            .max(highest_stored)
            .checked_add(1)
            .ok_or_else(|| HealthError::StorageError("Record id counter overflow".to_string()))?;

        self.storage.borrow_mut().set_json(RECORD_SEQ_KEY, &next)?;
        Ok(next)
    }
}
