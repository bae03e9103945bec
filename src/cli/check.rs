//! Validate a filter and render it as an AST, canonical text or tokens

use clap::ValueEnum;

use super::CliError;
use crate::{lexer, output, parser};

/// What `check` prints on success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// The parsed tree as JSON
    #[default]
    Ast,
    /// The filter re-printed in canonical form
    Canonical,
    /// The token stream as JSON
    Tokens,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The `$filter` expression
    pub filter: String,
    pub output: OutputMode,
    /// Pretty-print JSON output
    pub pretty: bool,
}

/// Execute a check, returning the text to print
pub fn execute_check(options: &CheckOptions) -> Result<String, CliError> {
    let tokens = lexer::tokenize(&options.filter).map_err(crate::FilterError::from)?;

    if options.output == OutputMode::Tokens {
        let json = if options.pretty {
            serde_json::to_string_pretty(&tokens)?
        } else {
            serde_json::to_string(&tokens)?
        };
        return Ok(json);
    }

    let node = parser::parse(&tokens).map_err(crate::FilterError::from)?;

    let rendered = match options.output {
        OutputMode::Canonical => output::to_filter_string(&node),
        _ if options.pretty => output::to_json_pretty(&node)?,
        _ => output::to_json(&node)?,
    };
    Ok(rendered)
}
