use std::fmt;

/// Errors returned by [`RedditClient`](super::RedditClient) operations.
///
/// Every failure of a public call surfaces as exactly one of these variants.
/// Match on the variant (and on [`TokenError::kind`] or [`ApiError::code`])
/// when programmatic handling is needed.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum RedditError {
    /// The request never produced an HTTP response.
    ///
    /// Occurs on connection failures and timeouts, either while acquiring a
    /// token or while calling the API; see [`Phase`].
    #[display("{phase}: {source}")]
    #[from(skip)]
    Transport {
        /// Which request failed.
        phase: Phase,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// The token endpoint answered, but not with a usable token.
    Token(TokenError),

    /// The API answered with a non-2xx status code.
    #[display(
        "API error: {}. Status code: {status_code}",
        message.as_deref().unwrap_or("no message")
    )]
    #[from(skip)]
    Http {
        /// The HTTP status code received.
        status_code: u16,
        /// The `message` field of the response body, if any.
        message: Option<String>,
    },

    /// The API answered with a 2xx status but reported errors in the body.
    Api(ApiError),

    /// A 2xx response body could not be parsed as JSON.
    #[display("Failed to deserialize JSON at '{path}': {error}\n{body}")]
    #[from(skip)]
    Decode {
        /// The request path where the error occurred.
        path: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },

    /// Request parameters could not be encoded.
    #[display("Encoding error: {message}")]
    #[from(skip)]
    Encoding {
        /// Description of the encoding failure.
        message: String,
    },

    /// The base URL and path do not form a valid URL.
    InvalidUrl(url::ParseError),

    /// A token or user agent cannot be used as a header value.
    InvalidHeader(http::header::InvalidHeaderValue),
}

impl RedditError {
    pub(super) fn transport(phase: Phase) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Transport { phase, source }
    }
}

/// The request during which a transport failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Phase {
    /// Exchanging credentials for an access token.
    #[display("Error getting token")]
    Token,
    /// Calling the API itself.
    #[display("API error")]
    Api,
}

/// How the token endpoint failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenErrorKind {
    /// A 2xx response without `access_token` or `token_type`.
    MissingFields,
    /// A 4xx response, usually missing app permissions or wrong credentials.
    Rejected,
    /// Any other non-2xx response.
    Unexpected,
}

/// The token endpoint returned an unusable response.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct TokenError {
    pub(super) username: String,
    pub(super) kind: TokenErrorKind,
    pub(super) status_code: u16,
    pub(super) error: Option<String>,
    pub(super) error_description: Option<String>,
}

impl TokenError {
    /// The account the token was requested for.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The failure category.
    pub fn kind(&self) -> TokenErrorKind {
        self.kind
    }

    /// The HTTP status code returned by the token endpoint.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The `error` field reported by the token endpoint, as text.
    ///
    /// Non-string values are rendered as JSON, e.g. `401`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The `error_description` field reported by the token endpoint.
    pub fn error_description(&self) -> Option<&str> {
        self.error_description.as_deref()
    }
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            username,
            kind,
            status_code,
            error,
            error_description,
        } = self;
        let error = error.as_deref().unwrap_or("unknown error");
        let description = error_description.as_deref().unwrap_or("no description");

        write!(f, "Cannot obtain token for username {username}. ")?;
        match kind {
            TokenErrorKind::MissingFields => write!(f, "{error}. {description}."),
            TokenErrorKind::Rejected => write!(
                f,
                "Did you give {username} access in your Reddit App Preferences? \
                 {error}. {description}. Status code: {status_code}"
            ),
            TokenErrorKind::Unexpected => {
                write!(f, "{error}. {description}. Status code: {status_code}")
            }
        }
    }
}

/// Application-level errors embedded in a successful response body.
///
/// The API reports them as `json.errors`, a list of
/// `[code, description, field]` triples. The first code is the primary one.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{message}")]
pub struct ApiError {
    message: String,
    code: String,
    codes: Vec<String>,
}

impl ApiError {
    pub(super) fn new(message: String, codes: Vec<String>) -> Self {
        let code = codes.first().cloned().unwrap_or_default();
        Self {
            message,
            code,
            codes,
        }
    }

    /// All reported errors, formatted and joined with `". "`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The primary (first) error code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Every reported error code, in order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}
