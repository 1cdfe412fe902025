// pwmsg — Pair Store
//
// Ordered in-memory list of records mirrored to one storage slot. Every
// mutation rewrites the whole slot. Indices handed out by `filter()` always
// refer to the full list, so edit/delete never target the wrong record.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::models::{Record, Reveal, Schema};
use super::slot::SlotStorage;
use super::StoreError;

/// File name used by `write_export`.
pub const EXPORT_FILE_NAME: &str = "pw_to_msg_export.json";

pub struct PairStore<S: SlotStorage> {
    slot: S,
    schema: Schema,
    records: Vec<Record>,
}

impl<S: SlotStorage> PairStore<S> {
    /// Load the store from its slot. A missing or unreadable slot yields an
    /// empty store; the failure is logged, never returned.
    pub fn load(slot: S, schema: Schema) -> Self {
        let records = match slot.read(schema.storage_key()) {
            Ok(Some(raw)) => match parse_snapshot(&raw, schema) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(key = schema.storage_key(), error = %e, "Stored pairs are corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = schema.storage_key(), error = %e, "Load failed, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = records.len(), schema = %schema, "Pair store loaded");
        Self {
            slot,
            schema,
            records,
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the whole list into the slot.
    pub fn try_persist(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.records)?;
        self.slot.write(self.schema.storage_key(), &raw)
    }

    /// Like `try_persist`, but a failure is only logged. The in-memory list
    /// stays authoritative for the rest of the session.
    pub fn persist(&self) {
        if let Err(e) = self.try_persist() {
            tracing::warn!(key = self.schema.storage_key(), error = %e, "Save failed");
        }
    }

    /// Append `record`, or replace the record at `editing_index` entirely.
    /// Returns the index the record now occupies.
    pub fn create_or_update(
        &mut self,
        record: Record,
        editing_index: Option<usize>,
    ) -> Result<usize, StoreError> {
        if record.password().map_or(true, str::is_empty) {
            return Err(StoreError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        let record = self.schema.normalize(record);

        let index = match editing_index {
            Some(index) => {
                let len = self.records.len();
                let existing = self
                    .records
                    .get_mut(index)
                    .ok_or(StoreError::IndexOutOfRange { index, len })?;
                *existing = record;
                tracing::info!(index, "Record updated");
                index
            }
            None => {
                self.records.push(record);
                let index = self.records.len() - 1;
                tracing::info!(index, "Record added");
                index
            }
        };

        self.persist();
        Ok(index)
    }

    /// First record (in list order) whose password equals `query` exactly.
    pub fn reveal(&self, query: &str) -> Reveal<'_> {
        match self.records.iter().find(|r| r.unlocks_with(query)) {
            Some(record) if record.message.is_empty() => Reveal::EmptyMessage,
            Some(record) => Reveal::Message(&record.message),
            None => Reveal::NoMatch,
        }
    }

    /// Remove the record at `index`; later records shift down by one.
    pub fn delete(&mut self, index: usize) -> Result<Record, StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        let removed = self.records.remove(index);
        tracing::info!(index, "Record deleted");

        self.persist();
        Ok(removed)
    }

    /// Lazily yield `(original_index, record)` for every record containing
    /// `query` in its password, message or (v2) category.
    pub fn filter<'a>(
        &'a self,
        query: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Record)> + 'a {
        let include_category = self.schema.has_category();
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.contains(query, include_category))
    }

    /// Pretty-printed JSON array of every record, in store order.
    pub fn export_snapshot(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Write the snapshot to `dir/pw_to_msg_export.json`.
    pub fn write_export(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, self.export_snapshot()?)?;
        tracing::info!(path = %path.display(), count = self.records.len(), "Snapshot exported");
        Ok(path)
    }

    /// Replace the whole store with the JSON array in `text`.
    ///
    /// Nothing changes unless the text is a JSON array whose every element is
    /// an object with string (or null/absent) fields. Records without a
    /// password are admitted.
    pub fn import_snapshot(&mut self, text: &str) -> Result<usize, StoreError> {
        let records = parse_snapshot(text, self.schema)?;

        let missing = records.iter().filter(|r| r.password().is_none()).count();
        if missing > 0 {
            tracing::warn!(missing, "Imported records without a password can never be revealed");
        }

        self.records = records;
        tracing::info!(count = self.records.len(), "Snapshot imported");

        self.persist();
        Ok(self.records.len())
    }

    /// Read `path` asynchronously, then import its contents. The store is
    /// only touched once the read has completed.
    pub async fn import_file(&mut self, path: &Path) -> Result<usize, StoreError> {
        let text = tokio::fs::read_to_string(path).await?;
        self.import_snapshot(&text)
    }
}

/// Decode a JSON array of record objects. Every element must be an object
/// with string (or null/absent) fields; anything else is a `Format` error.
fn parse_snapshot(text: &str, schema: Schema) -> Result<Vec<Record>, StoreError> {
    let parsed: Value = serde_json::from_str(text)
        .map_err(|e| StoreError::Format(format!("could not parse JSON: {}", e)))?;

    let Value::Array(items) = parsed else {
        return Err(StoreError::Format(
            "expected a JSON array of records: [{pw, msg}, ...]".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(StoreError::Format(format!(
                    "element {} is not a record object",
                    i
                )));
            }
            serde_json::from_value::<Record>(item)
                .map(|r| schema.normalize(r))
                .map_err(|e| StoreError::Format(format!("element {}: {}", i, e)))
        })
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
