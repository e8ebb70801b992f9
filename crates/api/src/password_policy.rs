// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation for account credentials.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not meet complexity requirements.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password matches a forbidden value.
    #[error("Password must not match {field}")]
    MatchesForbiddenField { field: String },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length, in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Validates a new password for an account.
    ///
    /// The password may not equal (case-insensitively) the account's email,
    /// the local part of that email, or the account name.
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` if the password does not meet policy requirements.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        email: &str,
        name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = Self::calculate_complexity(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        let email: &str = email.trim();
        let local_part: &str = email.split('@').next().unwrap_or(email);
        let forbidden: [(&str, &str); 3] = [
            ("email", email),
            ("email", local_part),
            ("name", name.trim()),
        ];

        let password_lower: String = password.to_lowercase();
        for (field, value) in forbidden {
            if !value.is_empty() && password_lower == value.to_lowercase() {
                return Err(PasswordPolicyError::MatchesForbiddenField {
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Counts the character classes present: uppercase, lowercase, digit, symbol.
    fn calculate_complexity(password: &str) -> usize {
        let classes: [fn(&char) -> bool; 4] = [
            char::is_ascii_uppercase,
            char::is_ascii_lowercase,
            char::is_ascii_digit,
            |c: &char| !c.is_ascii_alphanumeric() && !c.is_whitespace(),
        ];

        classes
            .iter()
            .filter(|class| password.chars().any(|c| class(&c)))
            .count()
    }
}
