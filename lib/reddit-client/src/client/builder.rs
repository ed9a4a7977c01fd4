use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use url::Url;

use super::token::TokenCache;
use super::{Credentials, RedditClient, RedditError};

/// Reddit OAuth2 token endpoint.
pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Base URL of the OAuth-protected API.
pub const API_BASE_URL: &str = "https://oauth.reddit.com";

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "reddit (https://github.com/feross/reddit)";

/// Timeout applied to every request when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`RedditClient`].
///
/// Only the credentials are required. The endpoints default to Reddit's own
/// and only need changing to go through a proxy or a test server.
///
/// # Default Configuration
///
/// - **User agent**: [`DEFAULT_USER_AGENT`]
/// - **Timeout**: 30 seconds per request
/// - **Token endpoint**: [`TOKEN_URL`]
/// - **API base URL**: [`API_BASE_URL`]
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use reddit_client::{Credentials, RedditClient};
///
/// # fn example() -> Result<(), reddit_client::RedditError> {
/// let credentials = Credentials::new("my-bot", "hunter2", "app-id", "app-secret");
/// let client = RedditClient::builder(credentials)
///     .with_user_agent("my-bot/1.0 (by /u/me)")
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RedditClientBuilder {
    client: reqwest::Client,
    credentials: Credentials,
    user_agent: String,
    timeout: Duration,
    token_url: String,
    api_base_url: String,
}

impl RedditClientBuilder {
    pub(super) fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token_url: TOKEN_URL.to_string(),
            api_base_url: API_BASE_URL.to_string(),
        }
    }

    /// Builds the client.
    ///
    /// No network call happens here; the first token is requested by the
    /// first API call.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    /// - the token endpoint or API base URL cannot be parsed
    /// - the user agent is not a valid header value
    pub fn build(self) -> Result<RedditClient, RedditError> {
        let Self {
            client,
            credentials,
            user_agent,
            timeout,
            token_url,
            api_base_url,
        } = self;

        let token_url = Url::parse(&token_url)?;
        let api_base_url = Url::parse(&api_base_url)?;
        let user_agent = HeaderValue::from_str(&user_agent)?;

        Ok(RedditClient {
            client,
            credentials: Arc::new(credentials),
            user_agent,
            timeout,
            token_url,
            api_base_url,
            token_cache: TokenCache::default(),
        })
    }

    /// Sets the `user-agent` header sent with every request.
    ///
    /// Reddit asks clients to use a unique and descriptive user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the timeout applied to each request.
    ///
    /// A timeout is reported as [`RedditError::Transport`].
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Overrides the base URL that request paths are appended to.
    #[must_use]
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Uses a preconfigured `reqwest` client, e.g. to set a proxy.
    ///
    /// The builder timeout still applies to each request.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}
