//! Raw query-string decoding.
//!
//! The `filter` parameter repeats, and axum's built-in `Query`
//! extractor folds repeated names into one value, so the raw query
//! string is split and percent-decoded here instead. Unknown parameter
//! names are ignored.

/// Parameters shared by every entity endpoint. Empty strings mean the
/// parameter was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestParams {
    pub kind: String,
    pub ancestor: String,
    pub filters: Vec<String>,
    pub limit: usize,
}

impl RequestParams {
    /// Decode a raw query string, falling back to `default_limit` when
    /// no `limit` parameter is present.
    pub fn read(raw: Option<&str>, default_limit: usize) -> Result<Self, String> {
        let mut params = RequestParams {
            kind: String::new(),
            ancestor: String::new(),
            filters: Vec::new(),
            limit: default_limit,
        };
        for (name, value) in split_pairs(raw) {
            match name.as_str() {
                "kind" => params.kind = value,
                "ancestor" => params.ancestor = value,
                "filter" => params.filters.push(value),
                "limit" => {
                    params.limit = value
                        .parse()
                        .map_err(|_| format!("invalid limit `{value}`"))?;
                }
                _ => {}
            }
        }
        Ok(params)
    }
}

fn split_pairs(raw: Option<&str>) -> Vec<(String, String)> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(name), decode_component(value))
        })
        .collect()
}

/// Form decoding: '+' means space and must be rewritten before percent
/// decoding so an encoded `%2B` survives as a literal '+'.
fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        // Undecodable sequences are passed through verbatim.
        Err(_) => spaced,
    }
}
