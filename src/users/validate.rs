use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::dto::{CreateUserRequest, UpdateUserRequest};

const NAME_MIN: usize = 2;
const MAX_LEN: usize = 255;
const PASSWORD_MIN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks a normalized create request, collecting every violation.
pub fn create_user(req: &CreateUserRequest) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();
    check_name(&req.name, &mut violations);
    check_email(&req.email, &mut violations);
    check_password(&req.password, &mut violations);
    finish(violations)
}

/// Checks a normalized update request; absent fields are not validated.
pub fn update_user(req: &UpdateUserRequest) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();
    if let Some(name) = &req.name {
        check_name(name, &mut violations);
    }
    if let Some(email) = &req.email {
        check_email(email, &mut violations);
    }
    finish(violations)
}

fn check_name(name: &str, out: &mut Vec<FieldViolation>) {
    let len = name.chars().count();
    if len == 0 {
        out.push(FieldViolation::new("name", "is required"));
    } else if !(NAME_MIN..=MAX_LEN).contains(&len) {
        out.push(FieldViolation::new(
            "name",
            format!("must be between {NAME_MIN} and {MAX_LEN} characters"),
        ));
    }
}

fn check_email(email: &str, out: &mut Vec<FieldViolation>) {
    if email.is_empty() {
        out.push(FieldViolation::new("email", "is required"));
    } else if email.chars().count() > MAX_LEN {
        out.push(FieldViolation::new(
            "email",
            format!("must be at most {MAX_LEN} characters"),
        ));
    } else if !is_valid_email(email) {
        out.push(FieldViolation::new("email", "must be a valid email address"));
    }
}

fn check_password(password: &str, out: &mut Vec<FieldViolation>) {
    let len = password.chars().count();
    if len == 0 {
        out.push(FieldViolation::new("password", "is required"));
    } else if !(PASSWORD_MIN..=MAX_LEN).contains(&len) {
        out.push(FieldViolation::new(
            "password",
            format!("must be between {PASSWORD_MIN} and {MAX_LEN} characters"),
        ));
    }
}

fn finish(violations: Vec<FieldViolation>) -> Result<(), Vec<FieldViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
