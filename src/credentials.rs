use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;

/// Resolved API credentials, held in process memory for the run only
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Where the password value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// Literal password value
    Literal(String),
    /// `@<path>`: read the trimmed contents of a file
    File(PathBuf),
    /// Prompt on the controlling terminal without echo
    Prompt,
}

impl PasswordSource {
    /// Classify a raw password argument. A bare `@` is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw == "@stdin" {
            return Ok(PasswordSource::Prompt);
        }
        if let Some(path) = raw.strip_prefix('@') {
            if path.is_empty() {
                return Err(Error::Config(
                    "invalid password file specifier".to_string(),
                ));
            }
            return Ok(PasswordSource::File(PathBuf::from(path)));
        }
        Ok(PasswordSource::Literal(raw.to_string()))
    }

    /// Produce the password value this source describes
    pub fn read(self) -> Result<String> {
        match self {
            PasswordSource::Literal(value) => Ok(value),
            PasswordSource::File(path) => {
                let contents = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!(
                        "failed to read password file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(contents.trim().to_string())
            }
            PasswordSource::Prompt => rpassword::prompt_password("Password: ")
                .map_err(|e| Error::Config(format!("failed to read password: {}", e))),
        }
    }
}

/// Resolve username and password into two non-empty strings.
/// `password` carries the raw argument value, sentinels included.
pub fn resolve(username: Option<String>, password: Option<String>) -> Result<Credentials> {
    let username = username.unwrap_or_default();
    let password = match password {
        Some(raw) => PasswordSource::parse(&raw)?.read()?,
        None => String::new(),
    };

    if username.is_empty() || password.is_empty() {
        return Err(Error::Config(
            "a username and password must be defined".to_string(),
        ));
    }

    Ok(Credentials { username, password })
}
