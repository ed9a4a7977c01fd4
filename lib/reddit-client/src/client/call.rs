use headers::{ContentType, HeaderMapExt};
use http::header::{AUTHORIZATION, USER_AGENT};
use http::{HeaderValue, Method};
use reqwest::{Body, Request};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::encoding::{EncodedParams, Verb, encode};
use super::error::{ApiError, Phase};
use super::token::AccessToken;
use super::{Params, RedditClient, RedditError};

impl RedditClient {
    /// Sends one API request and decodes the 2xx body.
    pub(super) async fn send(
        &self,
        verb: Verb,
        path: &str,
        params: Params,
        token: &AccessToken,
    ) -> Result<Value, RedditError> {
        let mut url = self.build_url(path)?;
        let body = match encode(verb, &params)? {
            EncodedParams::Query(query) => {
                append_query(&mut url, &query);
                None
            }
            EncodedParams::Body { content_type, data } => Some((content_type, data)),
        };

        let mut authorization = HeaderValue::from_str(token.header_value())?;
        authorization.set_sensitive(true);
        let request = self.build_request(verb.into(), url, authorization, body);

        debug!(%verb, url = %request.url(), "sending...");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(RedditError::transport(Phase::Api))?;
        let status = response.status();
        debug!(status = status.as_u16(), "...receiving");

        let text = response
            .text()
            .await
            .map_err(RedditError::transport(Phase::Api))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(|body| body.get("message"))
                .map(render);
            return Err(RedditError::Http {
                status_code: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|error| RedditError::Decode {
            path: path.to_string(),
            error,
            body: text,
        })
    }

    pub(super) fn build_url(&self, path: &str) -> Result<Url, RedditError> {
        let url = format!(
            "{}/{}",
            self.api_base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(url.parse::<Url>()?)
    }

    pub(super) fn build_request(
        &self,
        method: Method,
        url: Url,
        authorization: HeaderValue,
        body: Option<(ContentType, Vec<u8>)>,
    ) -> Request {
        let mut request = Request::new(method, url);
        *request.timeout_mut() = Some(self.timeout);

        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(USER_AGENT, self.user_agent.clone());

        if let Some((content_type, data)) = body {
            request.headers_mut().typed_insert(content_type);
            *request.body_mut() = Some(Body::from(data));
        }

        request
    }
}

/// Keeps any query already present in the path.
fn append_query(url: &mut Url, query: &str) {
    if query.is_empty() {
        return;
    }
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
        _ => query.to_string(),
    };
    url.set_query(Some(&query));
}

/// Fails with [`RedditError::Api`] if the body reports errors in `json.errors`.
pub(super) fn check_embedded_errors(body: Value) -> Result<Value, RedditError> {
    match embedded_errors(&body) {
        Some(error) => Err(RedditError::Api(error)),
        None => Ok(body),
    }
}

fn embedded_errors(body: &Value) -> Option<ApiError> {
    let errors = body.get("json")?.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }

    let mut codes = Vec::with_capacity(errors.len());
    let mut messages = Vec::with_capacity(errors.len());
    for error in errors {
        let member = |index: usize| error.get(index).map_or_else(|| "null".to_string(), render);
        let code = member(0);
        messages.push(format!("{code}: {} ({})", member(1), member(2)));
        codes.push(code);
    }

    Some(ApiError::new(messages.join(". "), codes))
}

/// Renders a JSON member as text, strings without their quotes.
pub(super) fn render(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_string)
}
