//! Ordered local cache of records.
//!
//! # Design
//! Every operation keeps ids unique. `replace_all` drops later duplicates
//! returned by the server, and `append` overwrites an entry whose id is
//! already present instead of adding a second one.

use std::collections::HashSet;

use crate::types::{Record, RecordId};

#[derive(Debug, Clone, Default)]
pub struct RecordCollection {
    records: Vec<Record>,
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole sequence, preserving the given order.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        let mut seen = HashSet::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.id.clone()) {
                unique.push(record);
            } else {
                log::warn!("dropping duplicate record id {} from listing", record.id);
            }
        }
        self.records = unique;
    }

    pub fn append(&mut self, record: Record) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            self.records.push(record);
        }
    }

    /// Overwrite the entry with the same id. Returns false if there was none.
    pub fn replace(&mut self, record: Record) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }

    /// Remove the record with `id`. Absent ids are not an error.
    pub fn remove_by_id(&mut self, id: &RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        self.records.len() != before
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
