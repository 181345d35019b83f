//! Form and confirmation state for the create, update and delete popups.

use crate::types::{NewRepo, RepositoryRef};

pub const EMPTY_NAME: &str = "Repository name cannot be empty.";
pub const EMPTY_DESCRIPTION: &str = "Description cannot be empty.";
pub const DUPLICATE_NAME: &str = "Repository with this name already exists.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateField {
    #[default]
    Name,
    Description,
}

#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub name: String,
    pub description: String,
    pub focus: CreateField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl CreateForm {
    pub fn input(&mut self, c: char) {
        self.field_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            CreateField::Name => CreateField::Description,
            CreateField::Description => CreateField::Name,
        };
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            CreateField::Name => &mut self.name,
            CreateField::Description => &mut self.description,
        }
    }

    /// Check the form against the entries currently listed.
    pub fn validate(&self, existing: &[RepositoryRef]) -> Result<NewRepo, &'static str> {
        if self.name.trim().is_empty() {
            return Err(EMPTY_NAME);
        }
        if self.description.is_empty() {
            return Err(EMPTY_DESCRIPTION);
        }
        if existing.iter().any(|item| item.name() == self.name) {
            return Err(DUPLICATE_NAME);
        }
        Ok(NewRepo {
            name: self.name.clone(),
            description: self.description.clone(),
        })
    }

    /// Validate and, when valid, mark the form as in flight.
    /// Returns None while a request is already running.
    pub fn submit(&mut self, existing: &[RepositoryRef]) -> Option<NewRepo> {
        if self.submitting {
            return None;
        }
        self.error = None;
        match self.validate(existing) {
            Ok(new_repo) => {
                self.submitting = true;
                Some(new_repo)
            }
            Err(msg) => {
                self.error = Some(msg.to_string());
                None
            }
        }
    }

    pub fn fail(&mut self, message: &str) {
        self.submitting = false;
        self.error = Some(format!("Error creating repository: {}", message));
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateForm {
    pub name: String,
    pub description: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl UpdateForm {
    /// Pre-filled with the current description.
    pub fn new(name: &str, description: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            description: description.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    pub fn input(&mut self, c: char) {
        self.description.push(c);
    }

    pub fn backspace(&mut self) {
        self.description.pop();
    }

    pub fn submit(&mut self) -> Option<String> {
        if self.submitting {
            return None;
        }
        if self.description.is_empty() {
            self.error = Some(EMPTY_DESCRIPTION.to_string());
            return None;
        }
        self.error = None;
        self.submitting = true;
        Some(self.description.clone())
    }

    pub fn fail(&mut self, message: &str) {
        self.submitting = false;
        self.error = Some(format!("Error updating repository: {}", message));
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteConfirm {
    pub name: String,
    pub submitting: bool,
}

impl DeleteConfirm {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            submitting: false,
        }
    }

    pub fn confirm(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }
}

#[derive(Debug, Clone)]
pub enum Modal {
    Create(CreateForm),
    Update(UpdateForm),
    Delete(DeleteConfirm),
}

impl Modal {
    pub fn is_submitting(&self) -> bool {
        match self {
            Modal::Create(form) => form.submitting,
            Modal::Update(form) => form.submitting,
            Modal::Delete(confirm) => confirm.submitting,
        }
    }
}
