//! # Reddit Client
//!
//! A minimal async client for the [Reddit API](https://www.reddit.com/dev/api/),
//! authenticated with the OAuth2 *password grant*.
//!
//! The client takes care of:
//! - obtaining an access token and reusing it for half of its lifetime
//! - sending the `authorization` and `user-agent` headers
//! - encoding parameters the way the API expects them for each verb
//! - turning transport failures, token failures, HTTP errors and errors
//!   embedded in successful responses into a single [`RedditError`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reddit_client::{Credentials, Params, RedditClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::new("my-bot", "hunter2", "app-id", "app-secret");
//! let client = RedditClient::builder(credentials)
//!     .with_user_agent("my-bot/1.0 (by /u/me)")
//!     .build()?;
//!
//! // Token acquired automatically on first request
//! let listing = client
//!     .get("/r/rust/hot", Params::new().add("limit", 5))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Parameter Encoding
//!
//! Every request carries `api_type=json`. Where the parameters go depends on
//! the verb:
//!
//! | Verb | Encoding |
//! |------|----------|
//! | `GET` | query string |
//! | `POST` | `application/x-www-form-urlencoded` body |
//! | `PATCH`, `PUT`, `DELETE` | `application/json` body |
//!
//! ## Error Handling
//!
//! The API sometimes answers `200 OK` with errors in `json.errors`; those are
//! reported as [`RedditError::Api`]:
//!
//! ```rust,no_run
//! use reddit_client::{Params, RedditClient, RedditError};
//!
//! # async fn example(client: &RedditClient) -> Result<(), RedditError> {
//! match client.post("/api/comment", Params::new().add("text", "hi")).await {
//!     Ok(body) => println!("{body}"),
//!     Err(RedditError::Api(error)) if error.code() == "RATELIMIT" => {
//!         println!("slow down: {error}");
//!     }
//!     Err(error) => return Err(error),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Requests and token refreshes are traced with [`tracing`] at `debug` level.
//! Secrets are never part of the events.

mod client;

pub use self::client::{
    API_BASE_URL, AccessToken, ApiError, Credentials, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
    EncodedParams, ParamValue, Params, Phase, RedditClient, RedditClientBuilder, RedditError,
    SecureString, TOKEN_URL, TokenError, TokenErrorKind, Verb, encode,
};
