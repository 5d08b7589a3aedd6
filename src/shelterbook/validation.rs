//! Field-level guard clauses.
//!
//! A [`Validator`] collects every failing rule instead of stopping at the
//! first one. Callers commit a write only when [`Validator::finish`] returns
//! an empty list.

use chrono::NaiveDate;

/// Message templates shared by every entity.
#[derive(Debug, Clone, Copy)]
pub enum ErrorTemplate {
    EmptyField,
    TooShortOrLong,
    WeakPassword,
    InvalidField,
}

impl ErrorTemplate {
    pub fn render(self, field: &str, bounds: Option<(usize, usize)>) -> String {
        match self {
            ErrorTemplate::EmptyField => format!("Field '{}' is required to be filled in!", field),
            ErrorTemplate::TooShortOrLong => {
                let (min, max) = bounds.unwrap_or_default();
                format!(
                    "Field '{}' must be longer than '{}' and shorter than '{}'!",
                    field, min, max
                )
            }
            ErrorTemplate::WeakPassword => format!(
                "Field '{}' cannot contain special characters or non-Latin characters!",
                field
            ),
            ErrorTemplate::InvalidField => format!("Invalid field: {}", field),
        }
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// True when the length in characters falls outside `[min, max]`.
pub fn is_out_of_bounds(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len < min || len > max
}

/// Passwords are restricted to ASCII letters and digits.
pub fn is_weak_password(password: &str) -> bool {
    password.is_empty() || !password.chars().all(|c| c.is_ascii_alphanumeric())
}

/// True when `date` is today or later.
pub fn is_not_in_past(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if is_blank(value) {
            self.errors
                .push(ErrorTemplate::EmptyField.render(field, None));
        }
        self
    }

    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        if is_out_of_bounds(value, min, max) {
            self.errors
                .push(ErrorTemplate::TooShortOrLong.render(field, Some((min, max))));
        }
        self
    }

    /// Shorthand for `required` followed by `length`.
    pub fn text(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        self.required(field, value).length(field, value, min, max)
    }

    pub fn password(&mut self, field: &str, value: &str) -> &mut Self {
        if is_weak_password(value) {
            self.errors
                .push(ErrorTemplate::WeakPassword.render(field, None));
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: u32) -> &mut Self {
        if value == 0 {
            self.errors
                .push(ErrorTemplate::InvalidField.render(field, None));
        }
        self
    }

    pub fn in_past(&mut self, date: NaiveDate, today: NaiveDate) -> &mut Self {
        if is_not_in_past(date, today) {
            self.errors.push("Date cannot be in the future.".to_string());
        }
        self
    }

    /// Record a failure found by a caller-side check.
    pub fn check(&mut self, failed: bool, message: impl Into<String>) -> &mut Self {
        if failed {
            self.errors.push(message.into());
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Vec<String> {
        self.errors
    }
}
