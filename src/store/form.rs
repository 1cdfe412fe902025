// pwmsg — Edit form state
//
// Idle ──begin_edit(i)──▶ Editing(i) ──save──▶ Idle (record i replaced)
//                                    ──cancel─▶ Idle (no mutation)
// Idle ──save──▶ Idle (record appended)

use std::fmt;

use super::models::Record;
use super::repository::PairStore;
use super::slot::SlotStorage;
use super::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    /// Editing the record at this index of the full store.
    Editing(usize),
}

/// Field contents plus the index being edited, if any.
#[derive(Default)]
pub struct EditForm {
    state: FormState,
    pub password: String,
    pub message: String,
    pub category: String,
}

impl EditForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Pre-fill the fields from record `index` and enter `Editing(index)`.
    pub fn begin_edit<S: SlotStorage>(
        &mut self,
        store: &PairStore<S>,
        index: usize,
    ) -> Result<(), StoreError> {
        let record = store.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: store.len(),
        })?;

        self.password = record.password().unwrap_or_default().to_string();
        self.message = record.message.clone();
        self.category = record.category.clone();
        self.state = FormState::Editing(index);
        Ok(())
    }

    /// Discard the fields and return to `Idle`.
    pub fn cancel(&mut self) {
        self.clear();
        self.state = FormState::Idle;
    }

    /// Apply the form to the store: replace the edited record, or append when
    /// idle. On failure the state and fields are left as they were.
    pub fn save<S: SlotStorage>(&mut self, store: &mut PairStore<S>) -> Result<usize, StoreError> {
        let editing_index = match self.state {
            FormState::Editing(index) => Some(index),
            FormState::Idle => None,
        };
        let record = Record::new(
            self.password.clone(),
            self.message.clone(),
            self.category.clone(),
        );

        let index = store.create_or_update(record, editing_index)?;
        self.cancel();
        Ok(index)
    }

    fn clear(&mut self) {
        self.password.clear();
        self.message.clear();
        self.category.clear();
    }
}

impl fmt::Debug for EditForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditForm")
            .field("state", &self.state)
            .field("password", &"[REDACTED]")
            .field("message", &self.message)
            .field("category", &self.category)
            .finish()
    }
}
