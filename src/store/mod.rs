// pwmsg — Store Module
//
// The pair store and the durable slot it is mirrored to. Passwords are kept
// and compared in plain text.

mod db;
mod error;
mod form;
mod models;
mod repository;
mod slot;

pub use db::Database;
pub use error::StoreError;
pub use form::{EditForm, FormState};
pub use models::{Record, Reveal, Schema, EMPTY_MESSAGE_PLACEHOLDER, NO_MATCH_SENTINEL};
pub use repository::{PairStore, EXPORT_FILE_NAME};
pub use slot::{MemorySlots, SlotStorage};
