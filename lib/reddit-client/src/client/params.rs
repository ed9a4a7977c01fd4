use indexmap::IndexMap;
use serde::Serialize;

/// Name of the field injected in every API request.
pub(crate) const API_TYPE: &str = "api_type";

/// A scalar request parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::From)]
#[serde(untagged)]
pub enum ParamValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

/// Request parameters, sent as a query string, a form or a JSON object
/// depending on the HTTP verb.
///
/// # Example
///
/// ```rust
/// use reddit_client::Params;
///
/// let params = Params::new()
///     .add("sr", "rust")
///     .add("limit", 10)
///     .add("nsfw", false);
/// assert_eq!(params.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, derive_more::Deref)]
#[serde(transparent)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value for the same name.
    #[must_use]
    pub fn add(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a parameter, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Forces the API to answer with its JSON response type.
    pub(crate) fn with_api_type(mut self) -> Self {
        self.insert(API_TYPE, "json");
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
