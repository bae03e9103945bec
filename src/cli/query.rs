//! Parse a full URL or query string into system query options

use super::CliError;
use crate::query;

#[derive(Debug, Clone, Default)]
pub struct QueryCommandOptions {
    /// A URL (`https://host/People?$top=5`) or bare query string (`$top=5`)
    pub input: String,
    pub pretty: bool,
}

pub fn execute_query(options: &QueryCommandOptions) -> Result<String, CliError> {
    let input = options.input.trim();
    let parsed = if input.contains("://") {
        query::parse_url(input)?
    } else {
        query::parse_query_string(input)?
    };

    let json = if options.pretty {
        serde_json::to_string_pretty(&parsed)?
    } else {
        serde_json::to_string(&parsed)?
    };
    Ok(json)
}
