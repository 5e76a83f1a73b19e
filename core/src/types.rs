//! Domain types for health records.
//!
//! # Design
//! `Record` mirrors the remote schema, including the `_id` wire name, but is
//! defined independently from the mock-server crate. Integration tests catch
//! any schema drift between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, server-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single health entry as stored by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub value: String,
    /// ISO-8601 calendar date. Never parsed here.
    pub date: String,
}

impl Record {
    /// The four user-editable fields of this record.
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            title: self.title.clone(),
            description: self.description.clone(),
            value: self.value.clone(),
            date: self.date.clone(),
        }
    }
}

/// Request payload for both create and update. All four fields are always
/// sent together.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordFields {
    pub title: String,
    pub description: String,
    pub value: String,
    pub date: String,
}

impl RecordFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Value => &self.value,
            Field::Date => &self.date,
        }
    }

    pub fn set(&mut self, field: Field, text: impl Into<String>) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Value => &mut self.value,
            Field::Date => &mut self.date,
        };
        *slot = text.into();
    }
}

/// Names one of the four editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Value,
    Date,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Description, Field::Value, Field::Date];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Value => "value",
            Field::Date => "date",
        }
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// Credentials posted to `/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload posted to `/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}
