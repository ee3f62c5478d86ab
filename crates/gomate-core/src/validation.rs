// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Form validation
//
// Each form reports at most one message per field: the first rule it breaks.

use crate::types::{AppError, FieldError};

/// Fields of the registration form
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Fields of the edit-profile form
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Fields of the change-password form
#[derive(Debug, Clone, Default)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Collects the first failure of each field
#[derive(Default)]
struct Report {
    errors: Vec<FieldError>,
}

impl Report {
    fn check(&mut self, field: &'static str, failure: Option<&'static str>) -> &mut Self {
        if let Some(message) = failure {
            self.errors.push(FieldError { field, message });
        }
        self
    }

    fn finish(&mut self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

fn min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

fn username_error(username: &str) -> Option<&'static str> {
    if username.is_empty() {
        Some("Username is required")
    } else if !min_chars(username, 3) {
        Some("Username must be at least 3 characters")
    } else {
        None
    }
}

fn login_password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Password is required")
    } else if !min_chars(password, 6) {
        Some("Password must be at least 6 characters")
    } else {
        None
    }
}

fn name_error(
    value: &str,
    required: &'static str,
    too_short: &'static str,
) -> Option<&'static str> {
    if value.is_empty() {
        Some(required)
    } else if !min_chars(value, 2) {
        Some(too_short)
    } else {
        None
    }
}

fn email_error(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some("Email is required")
    } else if !is_email(email) {
        Some("Invalid email address")
    } else {
        None
    }
}

/// `local@domain.tld` with no whitespace and non-empty labels
pub fn is_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Rules for a new password, as used by registration and password change
fn strong_password_error(password: &str, required: &'static str) -> Option<&'static str> {
    if password.is_empty() {
        Some(required)
    } else if !min_chars(password, 6) {
        Some("Password must be at least 6 characters")
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("Password must contain at least one uppercase letter")
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some("Password must contain at least one lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one number")
    } else {
        None
    }
}

pub fn validate_login(username: &str, password: &str) -> Result<(), AppError> {
    Report::default()
        .check("username", username_error(username))
        .check("password", login_password_error(password))
        .finish()
}

pub fn validate_registration(form: &RegisterForm) -> Result<(), AppError> {
    let username = username_error(&form.username).or_else(|| {
        let allowed = form
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
        (!allowed).then_some("Username can only contain letters, numbers, and underscores")
    });

    let confirm = if form.confirm_password.is_empty() {
        Some("Please confirm your password")
    } else if form.confirm_password != form.password {
        Some("Passwords must match")
    } else {
        None
    };

    Report::default()
        .check(
            "firstName",
            name_error(
                &form.first_name,
                "First name is required",
                "First name must be at least 2 characters",
            ),
        )
        .check(
            "lastName",
            name_error(
                &form.last_name,
                "Last name is required",
                "Last name must be at least 2 characters",
            ),
        )
        .check("email", email_error(&form.email))
        .check("username", username)
        .check(
            "password",
            strong_password_error(&form.password, "Password is required"),
        )
        .check("confirmPassword", confirm)
        .finish()
}

pub fn validate_profile(form: &ProfileForm) -> Result<(), AppError> {
    Report::default()
        .check(
            "firstName",
            name_error(
                &form.first_name,
                "First name is required",
                "First name must be at least 2 characters",
            ),
        )
        .check(
            "lastName",
            name_error(
                &form.last_name,
                "Last name is required",
                "Last name must be at least 2 characters",
            ),
        )
        .check("email", email_error(&form.email))
        .finish()
}

pub fn validate_password_change(form: &PasswordChangeForm) -> Result<(), AppError> {
    let current = if form.current_password.is_empty() {
        Some("Current password is required")
    } else if !min_chars(&form.current_password, 6) {
        Some("Password must be at least 6 characters")
    } else {
        None
    };

    let new = strong_password_error(&form.new_password, "New password is required").or_else(
        || {
            (form.new_password == form.current_password)
                .then_some("New password must be different from current password")
        },
    );

    let confirm = if form.confirm_password.is_empty() {
        Some("Please confirm your new password")
    } else if form.confirm_password != form.new_password {
        Some("Passwords must match")
    } else {
        None
    };

    Report::default()
        .check("currentPassword", current)
        .check("newPassword", new)
        .check("confirmPassword", confirm)
        .finish()
}
