//! Access token acquisition with the password grant.

use std::time::SystemTime;

use headers::ContentType;
use http::Method;
use serde_json::Value;
use tracing::debug;

use super::call::render;
use super::error::{Phase, TokenError, TokenErrorKind};
use super::token::AccessToken;
use super::{RedditClient, RedditError};

impl RedditClient {
    /// Exchanges the account credentials for a new access token.
    ///
    /// Exactly one request is sent; nothing is retried.
    pub(super) async fn fetch_token(&self) -> Result<AccessToken, RedditError> {
        let username = self.credentials.username();
        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", self.credentials.password().as_str()),
        ];
        let data = serde_urlencoded::to_string(form.as_slice())
            .map_err(|e| RedditError::Encoding {
                message: format!("Failed to serialize token request: {e}"),
            })?
            .into_bytes();

        let request = self.build_request(
            Method::POST,
            self.token_url.clone(),
            self.credentials.basic_authorization()?,
            Some((ContentType::form_url_encoded(), data)),
        );

        debug!(url = %self.token_url, username, "requesting access token");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(RedditError::transport(Phase::Token))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(RedditError::transport(Phase::Token))?;
        debug!(status = status.as_u16(), "token endpoint answered");

        // Error pages are not always JSON, read whatever fields are there
        let body = serde_json::from_str::<Value>(&body).unwrap_or_default();
        let field = |name: &str| body.get(name).filter(|value| !value.is_null());

        let kind = if status.is_success() {
            if let (Some(token_type), Some(access_token)) =
                (field("token_type"), field("access_token"))
            {
                return Ok(AccessToken::new(
                    &render(token_type),
                    &render(access_token),
                    field("expires_in").and_then(lifetime_secs),
                    SystemTime::now(),
                ));
            }
            TokenErrorKind::MissingFields
        } else if status.is_client_error() {
            TokenErrorKind::Rejected
        } else {
            TokenErrorKind::Unexpected
        };

        Err(RedditError::Token(TokenError {
            username: username.to_string(),
            kind,
            status_code: status.as_u16(),
            error: field("error").map(render),
            error_description: field("error_description").map(render),
        }))
    }
}

/// Whole seconds of an `expires_in` member, fractions truncated.
///
/// Anything that is not a non-negative number counts as absent.
fn lifetime_secs(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(number) => number,
        Value::String(text) => return text.trim().parse::<f64>().ok().and_then(float_secs),
        _ => return None,
    };
    number
        .as_u64()
        .or_else(|| number.as_f64().and_then(float_secs))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_secs(secs: f64) -> Option<u64> {
    (secs.is_finite() && secs >= 0.0).then(|| secs as u64)
}
