// pwmsg — Record data models
//
// The password field is private and never included in Debug output.
// Serialized field names (`pw`, `msg`, `category`) are the on-disk and export
// format; they must not change without a new schema key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Shown instead of a matched record's message when that message is empty.
pub const EMPTY_MESSAGE_PLACEHOLDER: &str = "(empty message)";

/// Returned by a reveal when no record has the queried password.
pub const NO_MATCH_SENTINEL: &str = "No matching message found.";

/// One stored (password, message, category) triple.
///
/// `password` is `None` only for records admitted by an import that lacked
/// one; such records can never be revealed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "pw", default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,

    #[serde(rename = "msg", default, deserialize_with = "null_as_empty")]
    pub message: String,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub category: String,
}

impl Record {
    pub fn new(
        password: impl Into<String>,
        message: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            password: Some(password.into()),
            message: message.into(),
            category: category.into(),
        }
    }

    /// The stored password, if the record has one.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Exact, case-sensitive password comparison. A record without a
    /// password matches nothing.
    pub fn unlocks_with(&self, query: &str) -> bool {
        self.password.as_deref() == Some(query)
    }

    /// Case-sensitive substring match used by list filtering.
    pub fn contains(&self, query: &str, include_category: bool) -> bool {
        if query.is_empty() {
            return true;
        }
        self.password.as_deref().is_some_and(|pw| pw.contains(query))
            || self.message.contains(query)
            || (include_category && self.category.contains(query))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field(
                "password",
                &self.password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("message", &self.message)
            .field("category", &self.category)
            .finish()
    }
}

/// Accepts a string or `null` (read as `""`); anything else is an error.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Record shape and the storage key that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schema {
    /// Password and message only.
    V1,
    /// Password, message and category.
    #[default]
    V2,
}

impl Schema {
    /// Slot key the store is persisted under.
    pub fn storage_key(self) -> &'static str {
        match self {
            Schema::V1 => "pw_to_msg_pairs_v1",
            Schema::V2 => "pw_to_msg_pairs_v2",
        }
    }

    pub fn has_category(self) -> bool {
        matches!(self, Schema::V2)
    }

    /// Drop fields this schema does not carry.
    pub fn normalize(self, mut record: Record) -> Record {
        if !self.has_category() {
            record.category.clear();
        }
        record
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(Schema::V1),
            "v2" => Ok(Schema::V2),
            other => Err(format!("unknown schema '{}' (expected v1 or v2)", other)),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::V1 => f.write_str("v1"),
            Schema::V2 => f.write_str("v2"),
        }
    }
}

/// Outcome of looking up a message by password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal<'a> {
    Message(&'a str),
    EmptyMessage,
    NoMatch,
}

impl Reveal<'_> {
    /// The text shown to the user.
    pub fn text(&self) -> &str {
        match self {
            Reveal::Message(msg) => *msg,
            Reveal::EmptyMessage => EMPTY_MESSAGE_PLACEHOLDER,
            Reveal::NoMatch => NO_MATCH_SENTINEL,
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, Reveal::NoMatch)
    }
}

impl fmt::Display for Reveal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
