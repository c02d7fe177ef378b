//! Variant URLs: `/products/{handle}?Option=Value&...`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Everything except unreserved URL characters is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

impl SelectedOption {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_VALUE).to_string()
}

/// Product page URL with the variant's options encoded in the query string.
///
/// Always ends with a query string (possibly just `?`) so callers can append
/// `&key=value` pairs.
#[must_use]
pub fn variant_url(handle: &str, selected_options: &[SelectedOption]) -> String {
    options_url(&format!("/products/{}", encode(handle)), selected_options)
}

/// `path` with the options as its query string, for pages served under a
/// path other than `/products/{handle}`.
///
/// `path` is used as given and must already be URL-safe.
#[must_use]
pub fn options_url(path: &str, selected_options: &[SelectedOption]) -> String {
    let query = selected_options
        .iter()
        .map(|o| format!("{}={}", encode(&o.name), encode(&o.value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

/// Appends back-link parameters so the product page can link to where the
/// visitor came from.
#[must_use]
pub fn with_back_link(url: &str, back_url: &str, back_url_name: &str) -> String {
    let sep = if url.ends_with('?') { "" } else { "&" };
    format!(
        "{url}{sep}backUrl={}&backUrlName={}",
        encode(back_url),
        encode(back_url_name)
    )
}
