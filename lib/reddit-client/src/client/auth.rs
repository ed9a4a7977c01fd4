use std::fmt;

use base64::Engine;
use http::HeaderValue;
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// Passwords and app secrets are held in this type so they never show up in
/// `Debug` output or tracing events.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Account and application credentials for the password grant.
///
/// Nothing is validated here: a missing or wrong value is reported by the
/// token endpoint on the first call.
///
/// # Example
///
/// ```rust
/// use reddit_client::Credentials;
///
/// let credentials = Credentials::new("my-bot", "hunter2", "app-id", "app-secret");
/// assert_eq!(credentials.username(), "my-bot");
/// ```
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    username: String,
    password: SecureString,
    app_id: String,
    app_secret: SecureString,
}

impl Credentials {
    /// Creates credentials from an account login and an OAuth2 application.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<SecureString>,
        app_id: impl Into<String>,
        app_secret: impl Into<SecureString>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }

    /// The account login.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The OAuth2 client id.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub(super) fn password(&self) -> &SecureString {
        &self.password
    }

    /// Builds the `authorization: Basic base64(app_id:app_secret)` value.
    pub(super) fn basic_authorization(&self) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
        let credentials = format!("{}:{}", self.app_id, self.app_secret.as_str());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}
