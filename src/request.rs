//! Request building: URL assembly and parameter encoding.
//!
//! Every Status.io call goes through the two functions in this module.
//! [`build_url`] turns a base URL plus positional identifiers into the final
//! endpoint, and [`encode_parameters`] renders a [`Params`] mapping as an
//! `application/x-www-form-urlencoded` query string for read/delete verbs.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Number;
use url::{form_urlencoded, Url};

use crate::error::{Result, StatusioError};

/// A single request parameter value.
///
/// Status.io accepts text, numbers, and flat lists (component/container
/// combinations, metric series). Nothing nested can be expressed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Plain text.
    Text(String),
    /// A JSON number.
    Number(Number),
    /// A list of text values.
    List(Vec<String>),
    /// A list of numbers.
    Numbers(Vec<Number>),
}

impl ParamValue {
    /// Build a number value from a float.
    ///
    /// Returns `None` for NaN and infinities, which have no JSON form.
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(Self::Number)
    }

    /// Build a number list from floats.
    ///
    /// Returns `None` if any value is NaN or infinite.
    pub fn from_f64s(values: &[f64]) -> Option<Self> {
        values
            .iter()
            .map(|v| Number::from_f64(*v))
            .collect::<Option<Vec<_>>>()
            .map(Self::Numbers)
    }

    /// The value as text, or `None` for lists.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::List(_) | Self::Numbers(_) => None,
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

/// Status.io flags are the strings `"1"` and `"0"`.
impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Text(if value { "1" } else { "0" }.to_string())
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(u16, u32, u64, i32, i64);

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[String]> for ParamValue {
    fn from(value: &[String]) -> Self {
        Self::List(value.to_vec())
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

/// A flat mapping of parameter names to optional values.
///
/// `None` entries are dropped from query strings and serialized as `null` in
/// JSON bodies. Keys are kept sorted so encoded output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Option<ParamValue>>);

impl Params {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), Some(value.into()));
    }

    /// Set a parameter that may be absent.
    pub fn insert_opt<V: Into<ParamValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        self.0.insert(key.into(), value.map(Into::into));
    }

    /// Builder form of [`Params::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form of [`Params::insert_opt`].
    #[must_use]
    pub fn with_opt<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.insert_opt(key, value);
        self
    }

    /// Get a present (non-null) value.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key).and_then(Option::as_ref)
    }

    /// Returns true if the key is in the mapping, even with a null value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries, null ones included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Iterate over the parameter names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn entry_or_default(&mut self, key: &str, default: &str) {
        self.0
            .entry(key.to_string())
            .or_insert_with(|| Some(ParamValue::Text(default.to_string())));
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: Into<ParamValue>, const N: usize> From<[(K, V); N]> for Params {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Encode a parameter mapping as a query string.
///
/// Returns `None` when there is no mapping at all. Null entries are skipped,
/// lists repeat their key once per element, and keys and values are
/// form-urlencoded.
///
/// # Example
///
/// ```
/// use statusio::{encode_parameters, Params};
///
/// let params = Params::new()
///     .with("b", "x y")
///     .with_opt::<String>("a", None);
/// assert_eq!(encode_parameters(Some(&params)).as_deref(), Some("b=x+y"));
/// assert_eq!(encode_parameters(None), None);
/// ```
pub fn encode_parameters(params: Option<&Params>) -> Option<String> {
    let params = params?;
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (key, value) in params.iter() {
        match value {
            None => {}
            Some(ParamValue::List(items)) => {
                for item in items {
                    serializer.append_pair(key, item);
                }
            }
            Some(ParamValue::Numbers(items)) => {
                for item in items {
                    serializer.append_pair(key, &item.to_string());
                }
            }
            Some(scalar) => {
                if let Some(text) = scalar.as_text() {
                    serializer.append_pair(key, &text);
                }
            }
        }
    }

    Some(serializer.finish())
}

/// Build a URL from a base, extra path segments, and query parameters.
///
/// Empty segments are skipped. Each remaining segment is percent-encoded as a
/// single path component and joined with exactly one `/`. Encoded parameters
/// are appended to an existing query with `&`.
///
/// # Errors
///
/// Returns an error if the base URL does not parse or cannot carry a path.
///
/// # Example
///
/// ```
/// use statusio::build_url;
///
/// let url = build_url("https://h/v2/x", &["", "seg"], None).unwrap();
/// assert_eq!(url.as_str(), "https://h/v2/x/seg");
/// ```
pub fn build_url(base_url: &str, path_segments: &[&str], query: Option<&Params>) -> Result<Url> {
    let mut url = Url::parse(base_url)?;

    let segments: Vec<&str> = path_segments
        .iter()
        .copied()
        .filter(|s| !s.is_empty())
        .collect();

    if !segments.is_empty() {
        url.path_segments_mut()
            .map_err(|()| StatusioError::InvalidParameter {
                name: "base_url".to_string(),
                reason: format!("'{base_url}' cannot have path segments"),
            })?
            .pop_if_empty()
            .extend(segments);
    }

    if let Some(extra) = encode_parameters(query).filter(|q| !q.is_empty()) {
        let combined = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{extra}"),
            _ => extra,
        };
        url.set_query(Some(&combined));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_none_and_empty() {
        assert_eq!(encode_parameters(None), None);
        assert_eq!(encode_parameters(Some(&Params::new())).as_deref(), Some(""));
    }

    #[test]
    fn test_encode_drops_null_entries() {
        let params = Params::new()
            .with_opt::<&str>("a", None)
            .with("b", "x");
        assert_eq!(encode_parameters(Some(&params)).as_deref(), Some("b=x"));
    }

    #[test]
    fn test_encode_percent_encodes_keys_and_values() {
        let params = Params::new()
            .with("message subject", "Status & Notification")
            .with("name", "café");
        assert_eq!(
            encode_parameters(Some(&params)).as_deref(),
            Some("message+subject=Status+%26+Notification&name=caf%C3%A9")
        );
    }

    #[test]
    fn test_encode_numbers_and_lists() {
        let params = Params::new()
            .with("current_status", 300u16)
            .with("combo", vec!["c1-k1", "c2-k2"])
            .with("empty", Vec::<String>::new());
        assert_eq!(
            encode_parameters(Some(&params)).as_deref(),
            Some("combo=c1-k1&combo=c2-k2&current_status=300")
        );
    }

    #[test]
    fn test_build_url_skips_empty_segments() {
        let url = build_url("https://h/v2/x", &["", "seg"], None).unwrap();
        assert_eq!(url.as_str(), "https://h/v2/x/seg");
    }

    #[test]
    fn test_build_url_single_separator_with_trailing_slash() {
        let url = build_url("https://h/v2/", &["incident", "p1", "i1"], None).unwrap();
        assert_eq!(url.as_str(), "https://h/v2/incident/p1/i1");
    }

    #[test]
    fn test_build_url_without_segments_keeps_path() {
        let url = build_url("https://h/v2/x/", &[], None).unwrap();
        assert_eq!(url.as_str(), "https://h/v2/x/");

        let url = build_url("https://h/v2/x", &["", ""], None).unwrap();
        assert_eq!(url.as_str(), "https://h/v2/x");
    }

    #[test]
    fn test_build_url_encodes_segment_separators() {
        let url = build_url("https://h/v2", &["a/b c"], None).unwrap();
        assert_eq!(url.as_str(), "https://h/v2/a%2Fb%20c");
    }

    #[test]
    fn test_build_url_query_without_existing() {
        let params = Params::new().with("a", "1");
        let url = build_url("https://h/v2/x", &[], Some(&params)).unwrap();
        assert_eq!(url.as_str(), "https://h/v2/x?a=1");
    }

    #[test]
    fn test_build_url_query_appends_to_existing() {
        let params = Params::new().with("b", "2");
        let url = build_url("https://h/v2/x?a=1#frag", &["y"], Some(&params)).unwrap();
        assert_eq!(url.as_str(), "https://h/v2/x/y?a=1&b=2#frag");
    }

    #[test]
    fn test_build_url_all_null_query_leaves_url_alone() {
        let params = Params::new().with_opt::<&str>("a", None);
        let url = build_url("https://h/v2/x", &[], Some(&params)).unwrap();
        assert_eq!(url.as_str(), "https://h/v2/x");
    }

    #[test]
    fn test_build_url_rejects_invalid_base() {
        assert!(matches!(
            build_url("not a url", &["x"], None),
            Err(StatusioError::UrlError(_))
        ));
        assert!(matches!(
            build_url("mailto:ops@example.com", &["x"], None),
            Err(StatusioError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_params_serialize_nulls_verbatim() {
        let params = Params::new()
            .with("statuspage_id", "p1")
            .with("current_status", 100u16)
            .with("infrastructure_affected", vec!["c-k"])
            .with_opt::<String>("granular", None);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({
                "statuspage_id": "p1",
                "current_status": 100,
                "infrastructure_affected": ["c-k"],
                "granular": null
            })
        );
    }

    #[test]
    fn test_bool_becomes_flag_text() {
        assert_eq!(ParamValue::from(true), ParamValue::Text("1".to_string()));
        assert_eq!(ParamValue::from(false), ParamValue::Text("0".to_string()));
        assert!(ParamValue::from_f64(f64::NAN).is_none());
    }

    #[test]
    fn test_number_lists() {
        let values = ParamValue::from_f64s(&[20.7, 19.0]).unwrap();
        let params = Params::new().with("day_values", values.clone());
        assert_eq!(
            encode_parameters(Some(&params)).as_deref(),
            Some("day_values=20.7&day_values=19.0")
        );
        assert_eq!(serde_json::to_value(&values).unwrap(), serde_json::json!([20.7, 19.0]));
        assert!(ParamValue::from_f64s(&[1.0, f64::INFINITY]).is_none());
    }
}
