//! ddb command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Fetch one item; one value per key of the table
//! ddb get users abc
//!
//! # Query by partition key, comparing the sort key
//! ddb query orders c-42 ">=100"
//!
//! # Query a secondary index with filters
//! ddb query orders:byStatus shipped -f total>100 -f region=eu
//!
//! # Scan with a filter, legacy single-table mode
//! ddb --table orders scan --filter status=pending
//! ```

use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ddb::{
    args::{GetRequest, QueryRequest, ScanRequest, TableSpec},
    config::{FileConfig, Overrides, Settings},
    output::{self, OutputOptions, Printer},
    read::{decode, get_item, query::Query, scan::Scan},
    session::Session,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Read items from DynamoDB tables with terse positional queries
#[derive(Debug, Parser)]
#[command(name = "ddb", version, about)]
struct Cli {
    /// Configuration file [default: ~/.ddb.toml]
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Table to read, as table[:index]; every positional is then a key value
    #[arg(short, long, global = true, env = "DDB_TABLE")]
    table: Option<String>,

    /// Pretty-print records [default: on when stdout is a terminal]
    #[arg(
        short,
        long,
        global = true,
        env = "DDB_PRETTY",
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pretty: Option<bool>,

    /// Colour records [default: on when stdout is a terminal]
    #[arg(
        long,
        global = true,
        env = "DDB_COLOR",
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    color: Option<bool>,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true, env = "DDB_VERBOSE")]
    verbose: bool,

    /// Custom endpoint, e.g. http://localhost:8000 for DynamoDB Local
    #[arg(long, global = true, env = "DDB_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// AWS region
    #[arg(long, global = true, env = "DDB_REGION")]
    region: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch one item by its full primary key
    Get {
        /// table[:index] followed by one value per key
        #[arg(value_name = "ARGS", allow_negative_numbers = true)]
        values: Vec<String>,
    },
    /// Query by partition key, optionally comparing the sort key
    Query {
        /// table[:index] partition-value [op]sort-value
        #[arg(value_name = "ARGS", allow_negative_numbers = true)]
        values: Vec<String>,

        /// Filter clause field<op>value, with op one of = < <= > >=
        #[arg(short = 'f', long = "filter", value_name = "CLAUSE")]
        filters: Vec<String>,
    },
    /// Scan a table or index
    Scan {
        /// table[:index]
        #[arg(value_name = "ARGS")]
        values: Vec<String>,

        /// Filter clause field<op>value, with op one of = < <= > >=
        #[arg(short = 'f', long = "filter", value_name = "CLAUSE")]
        filters: Vec<String>,
    },
}

/// A validated request, ready to be sent.
#[derive(Debug)]
enum Request {
    Get(GetRequest),
    Query(QueryRequest),
    Scan(ScanRequest),
}

impl Command {
    /// Parse the positionals and filters without touching the network.
    fn into_request(self, table: Option<&str>) -> ddb::Result<Request> {
        let request = match self {
            Self::Get { values } => {
                let (table, values) = TableSpec::from_positionals(table, values)?;
                Request::Get(GetRequest::new(table, values)?)
            }
            Self::Query { values, filters } => {
                let (table, values) = TableSpec::from_positionals(table, values)?;
                Request::Query(QueryRequest::parse(table, values, &filters)?)
            }
            Self::Scan { values, filters } => {
                let (table, values) = TableSpec::from_positionals(table, values)?;
                Request::Scan(ScanRequest::parse(table, values, &filters)?)
            }
        };
        Ok(request)
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            table: self.table.clone(),
            pretty: self.pretty,
            color: self.color,
            verbose: self.verbose,
            endpoint_url: self.endpoint_url.clone(),
            region: self.region.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = FileConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let settings = Settings::resolve(cli.overrides(), file, io::stdout().is_terminal());
    init_tracing(settings.verbose)?;
    debug!(?settings, "resolved settings");

    let request = cli.command.into_request(settings.table.as_deref())?;
    debug!(?request, "parsed request");

    colored::control::set_override(settings.color);
    let options = OutputOptions {
        pretty: settings.pretty,
        color: settings.color,
    };
    let mut printer = Printer::new(io::BufWriter::new(io::stdout().lock()), options);
    let session = Session::from_env(settings.region, settings.endpoint_url).await;

    match request {
        Request::Get(request) => {
            if let Some(record) = get_item::get(&session, &session, request).await? {
                printer.print(record)?;
            }
        }
        Request::Query(request) => {
            let query = Query::plan(&session, request).await?;
            let records = decode::decode_stream(session.query(query).into_stream());
            let printed = output::print_all(records, &mut printer).await?;
            debug!(printed, "query finished");
        }
        Request::Scan(request) => {
            let scan = Scan::plan(request)?;
            let records = decode::decode_stream(session.scan(scan).into_stream());
            let printed = output::print_all(records, &mut printer).await?;
            debug!(printed, "scan finished");
        }
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` for this crate with `--verbose`.
fn init_tracing(verbose: bool) -> Result<()> {
    let directives = if verbose { "info,ddb=debug" } else { "info" };
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter: {directives}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    Ok(())
}
