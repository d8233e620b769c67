//! Account form validation. There is no account backend; accepted forms are
//! only acknowledged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Public,
    Researcher,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Public => "public",
            Role::Researcher => "researcher",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    PasswordMismatch,
    MissingField(&'static str),
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::PasswordMismatch => write!(f, "Passwords do not match!"),
            FormError::MissingField(name) => write!(f, "Please fill in the {name} field."),
        }
    }
}

impl std::error::Error for FormError {}

impl Registration {
    /// Returns the acknowledgement shown to the user.
    pub fn validate(&self) -> Result<String, FormError> {
        for (name, value) in [("username", &self.username), ("email", &self.email)] {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(name));
            }
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(format!(
            "Registration successful for {} ({})",
            self.username,
            self.role.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{FormError, Registration, Role};

    fn form(password: &str, confirm: &str) -> Registration {
        Registration {
            username: "ndapewa".to_string(),
            email: "ndapewa@example.na".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            role: Role::Researcher,
        }
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let err = form("hunter2", "hunter3").validate().unwrap_err();
        assert_eq!(err, FormError::PasswordMismatch);
        assert_eq!(err.to_string(), "Passwords do not match!");
    }

    #[test]
    fn matching_passwords_are_acknowledged() {
        assert_eq!(
            form("s3cret", "s3cret").validate().unwrap(),
            "Registration successful for ndapewa (researcher)"
        );
    }

    #[test]
    fn blank_username_is_rejected() {
        let mut f = form("a", "a");
        f.username = "  ".to_string();
        assert_eq!(f.validate(), Err(FormError::MissingField("username")));
    }
}
