//! The dual-purpose create/edit form.

use crate::types::{Field, Record, RecordFields, RecordId};

/// Whether a submit creates a new record or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(RecordId),
}

/// Pending user input plus the mode it will be submitted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: RecordFields,
    mode: FormMode,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one field's text. Input is free-form; validation happens on
    /// submit.
    pub fn set_field(&mut self, field: Field, text: impl Into<String>) {
        self.fields.set(field, text);
    }

    pub fn reset(&mut self) {
        self.fields = RecordFields::default();
        self.mode = FormMode::Create;
    }

    pub fn load_for_edit(&mut self, record: &Record) {
        self.fields = record.fields();
        self.mode = FormMode::Edit(record.id.clone());
    }

    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id().is_some()
    }

    pub fn heading(&self) -> &'static str {
        if self.is_editing() {
            "Edit Record"
        } else {
            "Add New Record"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Record"
        } else {
            "Add Record"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            id: RecordId::new("a1"),
            title: "Weight".to_string(),
            description: "Morning".to_string(),
            value: "70".to_string(),
            date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn starts_empty_in_create_mode() {
        let form = FormState::new();
        assert_eq!(form.mode(), &FormMode::Create);
        assert_eq!(form.fields(), &RecordFields::default());
        assert_eq!(form.submit_label(), "Add Record");
    }

    #[test]
    fn load_for_edit_copies_fields_and_remembers_id() {
        let mut form = FormState::new();
        form.load_for_edit(&record());
        assert_eq!(form.mode(), &FormMode::Edit(RecordId::new("a1")));
        assert_eq!(form.fields().title, "Weight");
        assert_eq!(form.fields().date, "2024-01-01");
        assert_eq!(form.heading(), "Edit Record");
    }

    #[test]
    fn reset_clears_fields_and_id() {
        let mut form = FormState::new();
        form.load_for_edit(&record());
        form.set_field(Field::Value, "72");
        form.reset();
        assert!(form.editing_id().is_none());
        assert_eq!(form.fields().value, "");
    }
}
