use crate::error::{AppError, AppResult};
use regex::Regex;

/// Shape check only; deliverability is the SMTP relay's problem.
pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();

    if !email_regex.is_match(email) {
        return Err(AppError::ValidationError(
            "Invalid email address".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("jane@example").is_err());
        assert!(validate_email("janeexample.com").is_err());
        assert!(validate_email("jane @example.com").is_err());
    }
}
