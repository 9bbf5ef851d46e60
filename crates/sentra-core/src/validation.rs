//! Credential validation rules for registration.
//!
//! Every rule is evaluated independently so the caller gets the full list of
//! violations in one pass, not just the first.

/// Characters accepted as the "special character" password requirement.
const SPECIAL_CHARS: &str = "!@#$%^&*()-_=+[]{}|;:'\",.<>/?`~";

const MIN_PASSWORD_LEN: usize = 8;

pub const MSG_NO_LOWERCASE: &str = "Password must contain at least one lowercase letter.";
pub const MSG_NO_UPPERCASE: &str = "Password must contain at least one uppercase letter.";
pub const MSG_NO_DIGIT: &str = "Password must contain at least one number.";
pub const MSG_NO_SPECIAL: &str = "Password must contain at least one special character.";
pub const MSG_TOO_SHORT: &str = "Password must be at least 8 characters long.";
pub const MSG_BAD_EMAIL: &str = "Email is not valid";

/// Validate a password/email pair. Returns the list of violated rules;
/// an empty list means both are acceptable. Deterministic, no side effects.
pub fn validate_credentials(password: &str, email: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(MSG_NO_LOWERCASE.to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(MSG_NO_UPPERCASE.to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(MSG_NO_DIGIT.to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        violations.push(MSG_NO_SPECIAL.to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        violations.push(MSG_TOO_SHORT.to_string());
    }
    if !is_valid_email(email) {
        violations.push(MSG_BAD_EMAIL.to_string());
    }

    violations
}

/// `local@domain.tld` syntax check. Intentionally simple - deliverability is
/// proven by the verification mail, not by the parser.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_password_and_email() {
        let errors = validate_credentials("Valid1@Password", "user@example.com");
        assert!(errors.is_empty());
    }

    #[test]
    fn rejects_password_missing_lowercase() {
        let errors = validate_credentials("PASSWORD1@", "user@example.com");
        assert!(errors.contains(&MSG_NO_LOWERCASE.to_string()));
    }

    #[test]
    fn rejects_password_missing_uppercase() {
        let errors = validate_credentials("password1@", "user@example.com");
        assert!(errors.contains(&MSG_NO_UPPERCASE.to_string()));
    }

    #[test]
    fn rejects_password_missing_digit() {
        let errors = validate_credentials("Password@", "user@example.com");
        assert!(errors.contains(&MSG_NO_DIGIT.to_string()));
    }

    #[test]
    fn rejects_password_missing_special_char() {
        let errors = validate_credentials("Password1", "user@example.com");
        assert!(errors.contains(&MSG_NO_SPECIAL.to_string()));
    }

    #[test]
    fn rejects_short_password() {
        let errors = validate_credentials("P1@a", "user@example.com");
        assert!(errors.contains(&MSG_TOO_SHORT.to_string()));
    }

    #[test]
    fn rejects_invalid_email() {
        let errors = validate_credentials("Valid1@Password", "invalid-email");
        assert!(errors.contains(&MSG_BAD_EMAIL.to_string()));
    }

    #[test]
    fn rejects_email_without_tld() {
        let errors = validate_credentials("Valid1@Password", "user@localhost");
        assert!(errors.contains(&MSG_BAD_EMAIL.to_string()));
    }

    #[test]
    fn collects_all_violations_at_once() {
        let errors = validate_credentials("short", "invalid");
        assert!(errors.contains(&MSG_NO_UPPERCASE.to_string()));
        assert!(errors.contains(&MSG_NO_DIGIT.to_string()));
        assert!(errors.contains(&MSG_NO_SPECIAL.to_string()));
        assert!(errors.contains(&MSG_TOO_SHORT.to_string()));
        assert!(errors.contains(&MSG_BAD_EMAIL.to_string()));
    }
}
