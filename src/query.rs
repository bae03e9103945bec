//! OData V4 system query options.
//!
//! Splits a query string into the options this crate understands and parses
//! each one. `$filter` goes through the full tokenizer and parser; the other
//! options are simple lists, flags or integers.
//!
//! ```
//! use odata_filter::query::{parse_query_string, Direction};
//!
//! let options = parse_query_string("$top=10&$orderby=Name desc&$filter=Age gt 18").unwrap();
//! assert_eq!(options.top, Some(10));
//! assert_eq!(options.orderby.unwrap()[0].direction, Direction::Desc);
//! assert!(options.filter.is_some());
//! ```

use std::{collections::HashSet, fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::{Url, form_urlencoded};

use crate::{ast::FilterNode, error::FilterError, parser::parse_filter};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid $filter: {0}")]
    Filter(#[from] FilterError),

    #[error("{option} must be a non-negative integer, got '{value}'")]
    NotANonNegativeInteger { option: &'static str, value: String },

    #[error("unsupported $format '{0}' (expected json, xml, csv or tsv)")]
    UnsupportedFormat(String),
}

/// Parsed system query options. Options absent from the query stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryOptions {
    pub count: bool,
    pub expand: Option<Vec<String>>,
    pub filter: Option<FilterNode>,
    pub format: Option<Format>,
    pub orderby: Option<Vec<OrderBy>>,
    pub search: Option<String>,
    pub select: Option<Vec<String>>,
    pub skip: Option<u64>,
    pub top: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Xml,
    Csv,
    Tsv,
}

impl FromStr for Format {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "csv" => Ok(Format::Csv),
            "tsv" => Ok(Format::Tsv),
            other => Err(QueryError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Csv => "csv",
            Format::Tsv => "tsv",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One `$orderby` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

static ORDERBY_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<field>.+?)\s+(?P<direction>asc|desc)$").expect("valid $orderby pattern")
});

/// Parse the query component of a full URL.
pub fn parse_url(url: &str) -> Result<QueryOptions, QueryError> {
    let url = Url::parse(url)?;
    parse_query_string(url.query().unwrap_or_default())
}

/// Parse a raw (still percent-encoded) query string, with or without the leading `?`.
pub fn parse_query_string(query: &str) -> Result<QueryOptions, QueryError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    parse_query_params(form_urlencoded::parse(query.as_bytes()))
}

/// Parse already-decoded key/value pairs.
///
/// The first occurrence of a key wins, empty values are skipped and keys that
/// are not system query options are ignored.
pub fn parse_query_params<I, K, V>(params: I) -> Result<QueryOptions, QueryError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut options = QueryOptions::default();
    let mut seen = HashSet::new();

    for (key, value) in params {
        let (key, value) = (key.as_ref(), value.as_ref());

        if value.is_empty() {
            tracing::debug!(option = key, "skipping empty query option");
            continue;
        }
        if !seen.insert(key.to_string()) {
            tracing::debug!(option = key, "ignoring repeated query option");
            continue;
        }

        match key {
            "$count" => options.count = value.eq_ignore_ascii_case("true"),
            "$expand" => options.expand = Some(split_list(value)),
            "$filter" => options.filter = Some(parse_filter(value)?),
            "$format" => options.format = Some(value.parse()?),
            "$orderby" => options.orderby = Some(parse_orderby(value)),
            "$search" => options.search = Some(value.trim().to_string()),
            "$select" => options.select = Some(split_list(value)),
            "$skip" => options.skip = Some(parse_non_negative("$skip", value)?),
            "$top" => options.top = Some(parse_non_negative("$top", value)?),
            other => tracing::debug!(option = other, "ignoring unsupported query option"),
        }
    }

    Ok(options)
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|item| item.trim().to_string()).collect()
}

fn parse_orderby(value: &str) -> Vec<OrderBy> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match ORDERBY_ITEM.captures(item) {
            Some(caps) => OrderBy {
                field: caps["field"].to_string(),
                direction: if caps["direction"].eq_ignore_ascii_case("desc") {
                    Direction::Desc
                } else {
                    Direction::Asc
                },
            },
            None => OrderBy {
                field: item.to_string(),
                direction: Direction::Asc,
            },
        })
        .collect()
}

// Signed parse so that `-0` is accepted as zero.
fn parse_non_negative(option: &'static str, value: &str) -> Result<u64, QueryError> {
    value
        .trim()
        .parse::<i128>()
        .ok()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| QueryError::NotANonNegativeInteger {
            option,
            value: value.to_string(),
        })
}
