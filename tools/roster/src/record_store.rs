use crate::errors::RosterError;
use crate::types::Record;

pub const MAX_RECORDS: usize = 100;

/// Bounded, append-only list of records. Entries are never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<Record>,
    capacity: usize,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(MAX_RECORDS),
            capacity: MAX_RECORDS,
        }
    }

    /// Capacity can be lowered for a session but never raised past `MAX_RECORDS`.
    pub fn with_capacity(capacity: usize) -> Result<Self, RosterError> {
        if capacity == 0 || capacity > MAX_RECORDS {
            return Err(RosterError::InvalidConfig(format!(
                "store capacity must be between 1 and {MAX_RECORDS}, got {capacity}"
            )));
        }
        Ok(Self {
            records: Vec::with_capacity(capacity),
            capacity,
        })
    }

    /// Appends a record and returns the position it was stored at.
    pub fn add(&mut self, name: impl Into<String>, age: i32) -> Result<usize, RosterError> {
        if self.is_full() {
            return Err(RosterError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.records.push(Record::new(name, age));
        Ok(self.records.len() - 1)
    }

    pub fn fetch(&self, index: i64) -> Result<&Record, RosterError> {
        usize::try_from(index)
            .ok()
            .and_then(|position| self.records.get(position))
            .ok_or(RosterError::InvalidIndex {
                index,
                len: self.records.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}
