use clap::{ArgAction, Parser as ClapParser, Subcommand};
use odata_filter::cli::{self, CheckOptions, CliError, OutputMode, QueryCommandOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "odata")]
#[command(about = "Parse and validate OData V4 $filter expressions and query options")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a $filter expression and print the result
    Check {
        /// The filter expression (reads from stdin if not provided)
        filter: Option<String>,

        /// What to print on success
        #[arg(short, long, value_enum, default_value_t = OutputMode::Ast)]
        output: OutputMode,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse a URL or query string into system query options
    Query {
        /// Full URL or query string such as '$top=5&$filter=Age gt 18'
        input: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'odata docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check {
            filter,
            output,
            pretty,
        } => run_check(filter, output, pretty),
        Commands::Query { input, pretty } => {
            cli::execute_query(&QueryCommandOptions { input, pretty }).map(|out| println!("{}", out))
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| print!("{}", content)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(filter: Option<String>, output: OutputMode, pretty: bool) -> Result<(), CliError> {
    let filter = match filter {
        Some(s) => s,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoInput),
    };

    let options = CheckOptions {
        filter,
        output,
        pretty,
    };

    println!("{}", cli::execute_check(&options)?);
    Ok(())
}
