use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::resources::admin::AdminRole;

pub const PASSWORD_MIN_LEN: usize = 8;

pub const REQUIRED: &str = "This field is required";

/// Field-scoped validation messages, keyed by the wire name of the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        // keep the first message per field, like a form shows one at a time
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Clear the message of one field, e.g. when the user edits it again.
    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Require a non-blank value.
    pub fn require(&mut self, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, REQUIRED);
            false
        } else {
            true
        }
    }

    /// Check a required text field against a length window.
    pub fn text(
        &mut self,
        field: &'static str,
        label: &str,
        value: &str,
        min: usize,
        max: usize,
    ) {
        let len = value.chars().count();
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
        } else if len < min {
            self.add(
                field,
                format!("{label} must be at least {min} characters"),
            );
        } else if len > max {
            self.add(field, format!("{label} cannot exceed {max} characters"));
        }
    }

    /// Check a required absolute URL.
    pub fn url(&mut self, field: &'static str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
        } else if reqwest::Url::parse(value).is_err() {
            self.add(field, "Please provide a valid URL");
        }
    }

    /// Check an optional URL, accepting blank values.
    pub fn optional_url(&mut self, field: &'static str, value: Option<&str>) {
        if let Some(value) = value
            && !value.trim().is_empty()
            && reqwest::Url::parse(value).is_err()
        {
            self.add(field, "Please provide a valid URL");
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Form-level checks run before anything is sent to the backend.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Register {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Password change as submitted by the settings form.
///
/// Only the current and new password are sent; the confirmation is checked
/// locally.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl Validate for ChangePassword {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.new_password != self.confirm_password {
            errors.add("confirmPassword", "New passwords do not match");
        }
        if self.new_password.chars().count() < PASSWORD_MIN_LEN {
            errors.add(
                "newPassword",
                "New password must be at least 8 characters long",
            );
        }
        if self.current_password.is_empty() {
            errors.add("currentPassword", "Current password is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
}

impl Validate for AddAdmin {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("name", &self.name);
        errors.require("email", &self.email);
        if self.password.chars().count() < PASSWORD_MIN_LEN {
            errors.add("password", "Password must be at least 8 characters");
        }
        errors.into_result()
    }
}

/// Body of the status-only endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActive {
    pub is_active: bool,
}
