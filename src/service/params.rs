//! Search parameter coercion
//!
//! Query parameters are never rejected. Numbers are read the way a lenient
//! integer parser reads them: leading whitespace and an optional sign, then
//! as many digits as follow. Anything unusable falls back to the default.

use crate::types::{PageRequest, DEFAULT_FROM, DEFAULT_LIMIT};
use regex::Regex;
use std::sync::LazyLock;

static INT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?)([0-9]+)").unwrap());

/// Raw `/products/search` parameters, first occurrence of each key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub from: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    /// Read parameters from a raw query string; undecodable bytes are replaced
    pub fn parse(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(raw) = raw else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "query" => &mut params.query,
                "from" => &mut params.from,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Coerce into a page request
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(self.cursor(), self.page_size()).with_query(self.query.clone())
    }

    /// `from`, with missing, non-numeric and negative values mapped to 0
    pub fn cursor(&self) -> u64 {
        match self.from.as_deref().and_then(parse_int_prefix) {
            Some(n) if n >= 0 => n as u64,
            _ => DEFAULT_FROM,
        }
    }

    /// `limit`, with missing, non-numeric and non-positive values mapped to 9
    pub fn page_size(&self) -> u32 {
        match self.limit.as_deref().and_then(parse_int_prefix) {
            Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
            _ => DEFAULT_LIMIT,
        }
    }
}

/// Parse the leading integer of `input`: `"12abc"` is 12, `"abc"` is `None`.
///
/// Values beyond the `i64` range saturate.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let captures = INT_PREFIX.captures(input)?;
    let negative = &captures[1] == "-";
    let digits = &captures[2];

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
