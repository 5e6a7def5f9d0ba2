//! Input validation for request bodies.
//!
//! Runs at the HTTP boundary so the services below only ever see
//! well-formed values.

use crate::auth::models::{LoginRequest, RegisterRequest};
use crate::books::models::BookPayload;
use crate::error::{AppError, FieldError};
use regex::Regex;
use std::sync::LazyLock;

const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

// ASCII addresses only: internationalized local parts and domains are rejected.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex")
});

/// Something that can check its own fields.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

fn non_empty(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.is_empty() {
        errors.push(FieldError::new(
            "body",
            field,
            "ensure this value has at least 1 characters",
        ));
    }
}

fn email(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(value) {
        errors.push(FieldError::new("body", field, "value is not a valid email address"));
    }
}

fn password(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "body",
            field,
            format!("ensure this value has at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        non_empty("nombre", &self.nombre, &mut errors);
        email("correo", &self.correo, &mut errors);
        password("contrasena", &self.contrasena, &mut errors);
        finish(errors)
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        email("correo", &self.correo, &mut errors);
        password("contrasena", &self.contrasena, &mut errors);
        finish(errors)
    }
}

impl Validate for BookPayload {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        non_empty("nombre", &self.nombre, &mut errors);
        non_empty("descripcion", &self.descripcion, &mut errors);
        finish(errors)
    }
}
