use std::collections::BTreeMap;

use crate::error::{AppError, Result};

/// Normalizes an email for storage and lookup: trimmed, lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_fullname(fullname: Option<&str>, errors: &mut BTreeMap<&'static str, String>) {
    match fullname {
        Some(f) if !f.trim().is_empty() => {}
        _ => {
            errors.insert("fullname", "Full name is required".to_string());
        }
    }
}

fn check_email(email: Option<&str>, errors: &mut BTreeMap<&'static str, String>) {
    match email {
        None => {
            errors.insert("email", "Email is required".to_string());
        }
        Some(e) if e.trim().is_empty() => {
            errors.insert("email", "Email is required".to_string());
        }
        Some(e) if !e.contains('@') => {
            errors.insert("email", "Email is invalid".to_string());
        }
        Some(_) => {}
    }
}

fn check_password(password: Option<&str>, errors: &mut BTreeMap<&'static str, String>) {
    match password {
        None => {
            errors.insert("password", "Password is required".to_string());
        }
        Some(p) if p.len() < 8 => {
            errors.insert(
                "password",
                "Password must be at least 8 characters long".to_string(),
            );
        }
        Some(p) if p.len() > 128 => {
            errors.insert(
                "password",
                "Password must be at most 128 characters".to_string(),
            );
        }
        Some(_) => {}
    }
}

/// Validates a signup payload, reporting every failing field at once.
pub fn validate_signup(
    fullname: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    let mut errors = BTreeMap::new();
    check_fullname(fullname, &mut errors);
    check_email(email, &mut errors);
    check_password(password, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Validates a login payload. Presence only; credential quality is the
/// login service's concern.
pub fn validate_login(email: Option<&str>, password: Option<&str>) -> Result<()> {
    let mut errors = BTreeMap::new();
    if email.is_none_or(|e| e.trim().is_empty()) {
        errors.insert("email", "Email is required".to_string());
    }
    if password.is_none_or(|p| p.is_empty()) {
        errors.insert("password", "Password is required".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: AppError) -> BTreeMap<&'static str, String> {
        match err {
            AppError::Validation(fields) => fields,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn signup_reports_every_missing_field() {
        let errors = fields(validate_signup(None, None, None).unwrap_err());
        assert_eq!(errors["fullname"], "Full name is required");
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["password"], "Password is required");
    }

    #[test]
    fn short_password_is_rejected() {
        let errors = fields(
            validate_signup(Some("Alice"), Some("a@x.com"), Some("short")).unwrap_err(),
        );
        assert_eq!(
            errors["password"],
            "Password must be at least 8 characters long"
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn blank_fullname_is_rejected() {
        let errors =
            fields(validate_signup(Some("   "), Some("a@x.com"), Some("password1")).unwrap_err());
        assert_eq!(errors["fullname"], "Full name is required");
    }

    #[test]
    fn valid_signup_passes() {
        assert!(validate_signup(Some("Alice"), Some("a@x.com"), Some("password1")).is_ok());
    }

    #[test]
    fn email_is_case_normalized_and_trimmed() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }
}
