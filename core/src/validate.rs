use crate::condition::Condition;
use crate::types::{Field, RecordFields};

/// Reject field sets where any field is empty after trimming.
///
/// Runs before any network call, so an incomplete record is never sent.
pub fn validate(fields: &RecordFields) -> Result<(), Condition> {
    let missing: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|&f| fields.get(f).trim().is_empty())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Condition::ValidationFailed { missing })
    }
}
