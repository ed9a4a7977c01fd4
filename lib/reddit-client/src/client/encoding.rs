use headers::ContentType;
use http::Method;

use super::{Params, RedditError};

/// The HTTP verbs supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Verb {
    /// `GET`, parameters in the query string.
    #[display("GET")]
    Get,
    /// `POST`, parameters in a form-encoded body.
    #[display("POST")]
    Post,
    /// `PATCH`, parameters in a JSON body.
    #[display("PATCH")]
    Patch,
    /// `PUT`, parameters in a JSON body.
    #[display("PUT")]
    Put,
    /// `DELETE`, parameters in a JSON body.
    #[display("DELETE")]
    Delete,
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Patch => Method::PATCH,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

/// Parameters encoded for a given verb.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedParams {
    /// A query string, without the leading `?`.
    Query(String),
    /// A request body with its content type.
    Body {
        /// The body content type.
        content_type: ContentType,
        /// The encoded body.
        data: Vec<u8>,
    },
}

/// Encodes request parameters the way the API expects them for `verb`.
///
/// `POST` takes a form while `PATCH`, `PUT` and `DELETE` take JSON.
///
/// # Errors
///
/// Returns [`RedditError::Encoding`] if the parameters cannot be serialized.
pub fn encode(verb: Verb, params: &Params) -> Result<EncodedParams, RedditError> {
    let encoded = match verb {
        Verb::Get => EncodedParams::Query(form_encode(params)?),
        Verb::Post => EncodedParams::Body {
            content_type: ContentType::form_url_encoded(),
            data: form_encode(params)?.into_bytes(),
        },
        Verb::Patch | Verb::Put | Verb::Delete => EncodedParams::Body {
            content_type: ContentType::json(),
            data: serde_json::to_vec(params).map_err(|e| RedditError::Encoding {
                message: format!("Failed to serialize JSON body: {e}"),
            })?,
        },
    };
    Ok(encoded)
}

fn form_encode(params: &Params) -> Result<String, RedditError> {
    serde_urlencoded::to_string(params).map_err(|e| RedditError::Encoding {
        message: format!("Failed to serialize form data: {e}"),
    })
}
