use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use serde_json::Value;
use url::Url;

mod builder;
pub use self::builder::{
    API_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, RedditClientBuilder, TOKEN_URL,
};

mod auth;
pub use self::auth::{Credentials, SecureString};

mod call;

mod encoding;
pub use self::encoding::{EncodedParams, Verb, encode};

mod error;
pub use self::error::{ApiError, Phase, RedditError, TokenError, TokenErrorKind};

mod params;
pub use self::params::{ParamValue, Params};

mod provider;

mod token;
pub use self::token::AccessToken;
use self::token::TokenCache;

/// Async client for the Reddit API, authenticated with the OAuth2 password grant.
///
/// The client obtains an access token on the first call and reuses it for half
/// of its reported lifetime. Cloning is cheap and clones share the token, so a
/// single client can serve concurrent tasks.
///
/// # Example
///
/// ```rust,no_run
/// use reddit_client::{Credentials, Params, RedditClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("my-bot", "hunter2", "app-id", "app-secret");
/// let client = RedditClient::builder(credentials).build()?;
///
/// let me = client.get("/api/v1/me", Params::new()).await?;
///
/// client
///     .post(
///         "/api/submit",
///         Params::new()
///             .add("sr", "test")
///             .add("kind", "self")
///             .add("title", "Hello")
///             .add("text", "World"),
///     )
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// Token refresh is single-flight: concurrent calls hitting an expired token
/// wait for one exchange and share its result.
#[derive(Debug, Clone)]
pub struct RedditClient {
    client: reqwest::Client,
    credentials: Arc<Credentials>,
    user_agent: HeaderValue,
    timeout: Duration,
    token_url: Url,
    api_base_url: Url,
    token_cache: TokenCache,
}

// Create
impl RedditClient {
    /// Creates a builder for the given credentials.
    pub fn builder(credentials: Credentials) -> RedditClientBuilder {
        RedditClientBuilder::new(credentials)
    }
}

// Token
impl RedditClient {
    /// Returns a valid access token, requesting a new one if the cached token
    /// is absent or expired.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Transport`] or [`RedditError::Token`] if the
    /// token exchange fails.
    pub async fn access_token(&self) -> Result<AccessToken, RedditError> {
        self.token_cache.get_valid(|| self.fetch_token()).await
    }

    /// Drops the cached token so the next call requests a new one.
    ///
    /// The client never does this on its own, even when the API rejects the
    /// token. Call it after a 401 if the token may have been revoked.
    pub async fn invalidate_token(&self) {
        self.token_cache.clear().await;
    }
}

// Calls
impl RedditClient {
    /// Calls `path` with the given verb and returns the decoded response body.
    ///
    /// `api_type=json` is added to the parameters.
    ///
    /// # Errors
    ///
    /// - [`RedditError::Transport`] when no response was received
    /// - [`RedditError::Token`] when no token could be obtained
    /// - [`RedditError::Http`] for a non-2xx response
    /// - [`RedditError::Api`] for a 2xx response reporting errors in `json.errors`
    pub async fn call(&self, verb: Verb, path: &str, params: Params) -> Result<Value, RedditError> {
        let token = self.access_token().await?;
        let body = self.send(verb, path, params.with_api_type(), &token).await?;
        call::check_embedded_errors(body)
    }

    /// Sends a `GET` request, parameters in the query string.
    ///
    /// # Errors
    ///
    /// See [`RedditClient::call`].
    pub async fn get(&self, path: &str, params: Params) -> Result<Value, RedditError> {
        self.call(Verb::Get, path, params).await
    }

    /// Sends a `POST` request, parameters as a form body.
    ///
    /// # Errors
    ///
    /// See [`RedditClient::call`].
    pub async fn post(&self, path: &str, params: Params) -> Result<Value, RedditError> {
        self.call(Verb::Post, path, params).await
    }

    /// Sends a `PATCH` request, parameters as a JSON body.
    ///
    /// # Errors
    ///
    /// See [`RedditClient::call`].
    pub async fn patch(&self, path: &str, params: Params) -> Result<Value, RedditError> {
        self.call(Verb::Patch, path, params).await
    }

    /// Sends a `PUT` request, parameters as a JSON body.
    ///
    /// # Errors
    ///
    /// See [`RedditClient::call`].
    pub async fn put(&self, path: &str, params: Params) -> Result<Value, RedditError> {
        self.call(Verb::Put, path, params).await
    }

    /// Sends a `DELETE` request, parameters as a JSON body.
    ///
    /// # Errors
    ///
    /// See [`RedditClient::call`].
    pub async fn delete(&self, path: &str, params: Params) -> Result<Value, RedditError> {
        self.call(Verb::Delete, path, params).await
    }
}
