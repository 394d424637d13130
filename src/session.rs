use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// Login endpoint of the Wikimedia Enterprise API
const LOGIN_URL: &str = "https://auth.enterprise.wikimedia.com/v1/login";

/// Fixed User-Agent identifying this tool
const USER_AGENT_VALUE: &str = concat!(
    "wme-cache/",
    env!("CARGO_PKG_VERSION"),
    " (+https://enterprise.wikimedia.com/)"
);

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Authenticated HTTP session. Every request issued through it carries the
/// bearer token obtained at login plus the fixed User-Agent; the login POST
/// is the only request that ever goes out without the token.
pub struct Session {
    client: Client,
}

impl Session {
    /// Exchange credentials for a bearer token. A non-success response dumps
    /// the body to stdout and fails the run; there is no retry.
    pub fn login(credentials: &Credentials) -> Result<Self> {
        Self::login_at(LOGIN_URL, credentials)
    }

    pub(crate) fn login_at(url: &str, credentials: &Credentials) -> Result<Self> {
        let response = Client::new()
            .post(url)
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            println!("{}", body);
            return Err(Error::Auth { status, body });
        }

        let auth: LoginResponse = response.json()?;
        Self::with_token(&auth.access_token)
    }

    /// Build a session around an already-issued access token
    pub fn with_token(access_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", access_token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer)
                .map_err(|e| Error::Config(format!("access token is not header-safe: {}", e)))?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        // The blocking client's default whole-request timeout is far too
        // short for streaming a multi-gigabyte chunk download.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(None)
            .build()?;
        Ok(Self { client })
    }

    /// The configured HTTP client carrying the session headers
    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}
