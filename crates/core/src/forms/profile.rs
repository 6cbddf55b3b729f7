//! "My Profile" form.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::countries::is_known_country;
use super::password::{MIN_PASSWORD_LENGTH, validate_password};
use super::{FieldErrors, required};
use crate::types::{Email, Gender};

static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z ]+$").expect("Invalid regex"));

/// Raw profile form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub country: String,
    pub current_password: String,
    pub new_password: String,
    pub retype_new_password: String,
}

/// A validated profile update for the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: Email,
    pub gender: Gender,
    pub country: String,
    pub current_password: String,
    pub new_password: String,
}

impl ProfileForm {
    /// Copy of the form with the email reduced to accepted characters.
    ///
    /// Applied before validation and before re-rendering so the user sees
    /// exactly what would be submitted.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.email = Email::sanitize_input(&self.email);
        self
    }

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns all field errors; the new password reports only the first
    /// policy rule it breaks.
    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let full_name = required(
            &mut errors,
            "full_name",
            &self.full_name,
            "Full name is required",
        );
        if !full_name.is_empty() && !FULL_NAME_RE.is_match(&full_name) {
            errors.add("full_name", "Only letters and spaces are allowed");
        }

        let email = match Email::parse(&Email::sanitize_input(&self.email)) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.add("email", format!("Invalid email address: {e}"));
                None
            }
        };

        let gender = match self.gender.parse::<Gender>() {
            Ok(gender) => Some(gender),
            Err(_) => {
                errors.add("gender", "Select a gender");
                None
            }
        };

        let country = self.country.trim().to_owned();
        if !is_known_country(&country) {
            errors.add("country", "Select a country");
        }

        if self.current_password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "current_password",
                "Current password must be at least 16 characters.",
            );
        }

        if let Err(e) = validate_password(&self.new_password) {
            errors.add("new_password", e.to_string());
        }

        if self.retype_new_password != self.new_password {
            errors.add("retype_new_password", "Passwords do not match.");
        }

        match (email, gender) {
            (Some(email), Some(gender)) if errors.is_empty() => Ok(ProfileUpdate {
                full_name,
                email,
                gender,
                country,
                current_password: self.current_password.clone(),
                new_password: self.new_password.clone(),
            }),
            _ => Err(errors),
        }
    }
}
