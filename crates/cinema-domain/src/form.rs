//! Typed form validation.
//!
//! Each validator takes the raw submitted strings and returns either a
//! cleaned draft or a [`FieldErrors`] map keyed by form field name.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::region::Region;

pub const REVIEW_COMMENT_MAX: usize = 255;
pub const REPLY_COMMENT_MAX: usize = 500;
pub const PETITION_TITLE_MAX: usize = 200;
pub const USERNAME_MAX: usize = 150;
pub const PASSWORD_MIN: usize = 8;

/// Per-field validation messages, serialized as `{"field": "message"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<_> = self.0.keys().copied().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

// ── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentError {
    #[error("comment must not be empty")]
    Empty,
    #[error("comment must be at most {max} characters")]
    TooLong { max: usize },
}

/// Trim a review or reply comment and check it is non-empty and at most
/// `max` characters.
pub fn clean_comment(raw: &str, max: usize) -> Result<String, CommentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CommentError::Empty);
    }
    if trimmed.chars().count() > max {
        return Err(CommentError::TooLong { max });
    }
    Ok(trimmed.to_owned())
}

fn required_text(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: &str,
    max: Option<usize>,
) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field is required.");
    } else if let Some(max) = max.filter(|&max| trimmed.chars().count() > max) {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters."),
        );
    }
    trimmed.to_owned()
}

// ── Petitions ───────────────────────────────────────────────────────────────

/// A petition that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionDraft {
    pub movie_title: String,
    pub description: String,
    pub reason: String,
}

pub fn validate_petition(
    movie_title: &str,
    description: &str,
    reason: &str,
) -> Result<PetitionDraft, FieldErrors> {
    let mut errors = FieldErrors::new();
    let movie_title = required_text(
        &mut errors,
        "movie_title",
        movie_title,
        Some(PETITION_TITLE_MAX),
    );
    let description = required_text(&mut errors, "description", description, None);
    let reason = required_text(&mut errors, "reason", reason, None);

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(PetitionDraft {
        movie_title,
        description,
        reason,
    })
}

// ── Signup ──────────────────────────────────────────────────────────────────

/// Raw signup form values.
#[derive(Debug, Clone, Copy)]
pub struct SignupInput<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password1: &'a str,
    pub password2: &'a str,
    pub region: &'a str,
}

/// A signup that passed validation. `password` is still plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDraft {
    pub username: String,
    pub email: String,
    pub password: String,
    pub region: Region,
}

pub fn validate_signup(input: SignupInput<'_>) -> Result<SignupDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let username = input.username.trim();
    if username.is_empty() {
        errors.add("username", "This field is required.");
    } else if username.chars().count() > USERNAME_MAX {
        errors.add(
            "username",
            format!("Ensure this value has at most {USERNAME_MAX} characters."),
        );
    } else if !is_valid_username(username) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    let email = input.email.trim();
    if email.is_empty() {
        errors.add("email", "This field is required.");
    } else if !is_valid_email(email) {
        errors.add("email", "Enter a valid email address.");
    }

    if input.password1.is_empty() {
        errors.add("password1", "This field is required.");
    } else if input.password1.chars().count() < PASSWORD_MIN {
        errors.add(
            "password1",
            format!("This password is too short. It must contain at least {PASSWORD_MIN} characters."),
        );
    }
    if input.password2.is_empty() {
        errors.add("password2", "This field is required.");
    } else if input.password1 != input.password2 {
        errors.add("password2", "The two password fields didn't match.");
    }

    let region = match input.region.parse::<Region>() {
        Ok(region) => Some(region),
        Err(_) => {
            errors.add("region", "Select a valid choice.");
            None
        }
    };

    match region {
        Some(region) if errors.is_empty() => Ok(SignupDraft {
            username: username.to_owned(),
            email: email.to_owned(),
            password: input.password1.to_owned(),
            region,
        }),
        _ => Err(errors),
    }
}

fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain
            .split('.')
            .all(|label| !label.is_empty())
}
