//! In-memory agent list: the single source of truth the front end edits.
//!
//! Holds the ordered records (insertion order is display and on-disk order)
//! and an optional selected position. The selection, when present, always
//! refers to an in-bounds element; every shrinking mutation re-clamps it.

use crate::agent::domain::AgentRecord;
use crate::error::ApiError;

/// How imported records are combined with the current list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Discard the current list and adopt the imported one.
    Replace,
    /// Current list followed by the imported list. No de-duplication.
    Append,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentStore {
    records: Vec<AgentRecord>,
    selected: Option<usize>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store over loaded records; the first record is selected if any.
    pub fn from_records(records: Vec<AgentRecord>) -> Self {
        let selected = if records.is_empty() { None } else { Some(0) };
        Self { records, selected }
    }

    pub fn records(&self) -> &[AgentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AgentRecord> {
        self.records.get(index)
    }

    /// Record at `index` or `IndexOutOfRange`.
    pub fn get_or_error(&self, index: usize) -> Result<&AgentRecord, ApiError> {
        self.records.get(index).ok_or(ApiError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&AgentRecord> {
        self.selected.and_then(|index| self.records.get(index))
    }

    pub fn select(&mut self, index: usize) -> Result<(), ApiError> {
        self.check_index(index)?;
        self.selected = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Append a placeholder record with id `len + 1` and select it.
    ///
    /// The generated id is not checked against existing ids.
    pub fn create(&mut self) -> usize {
        let id = (self.records.len() + 1).to_string();
        self.push_selected(AgentRecord::placeholder(id))
    }

    /// Replace the record at `index`.
    pub fn update(&mut self, index: usize, record: AgentRecord) -> Result<(), ApiError> {
        self.check_index(index)?;
        self.records[index] = record;
        Ok(())
    }

    /// Remove the record at `index` and return it.
    ///
    /// A selection on the removed record moves to `min(index, len - 1)`, or
    /// is cleared when the list becomes empty. A selection after the removed
    /// record shifts down so it keeps pointing at the same record.
    pub fn delete(&mut self, index: usize) -> Result<AgentRecord, ApiError> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        self.selected = match self.selected {
            _ if self.records.is_empty() => None,
            Some(selected) if selected == index => Some(index.min(self.records.len() - 1)),
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        Ok(removed)
    }

    /// Append a copy of the record at `index` (see `AgentRecord::duplicated`)
    /// and select it. Returns the new position.
    pub fn duplicate(&mut self, index: usize) -> Result<usize, ApiError> {
        let copy = self.get_or_error(index)?.duplicated();
        Ok(self.push_selected(copy))
    }

    /// Adopt `records` wholesale; the first record becomes selected.
    pub fn replace_all(&mut self, records: Vec<AgentRecord>) {
        *self = Self::from_records(records);
    }

    /// Append `records` after the current list without any id check.
    ///
    /// An existing selection is kept; with no selection the first record
    /// becomes selected.
    pub fn append_all(&mut self, records: Vec<AgentRecord>) {
        self.records.extend(records);
        if self.selected.is_none() && !self.records.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn import(&mut self, records: Vec<AgentRecord>, policy: ImportPolicy) {
        match policy {
            ImportPolicy::Replace => self.replace_all(records),
            ImportPolicy::Append => self.append_all(records),
        }
    }

    fn push_selected(&mut self, record: AgentRecord) -> usize {
        self.records.push(record);
        let index = self.records.len() - 1;
        self.selected = Some(index);
        index
    }

    fn check_index(&self, index: usize) -> Result<(), ApiError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(ApiError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }
}
