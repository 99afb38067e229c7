//! `dbx` command-line entry point.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dbx::database::traits::{SchemaIntrospection, Value, columns, tables};
use dbx::{StringMapper, open_with_schema};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect a database and resolve lookup keys
#[derive(Parser, Debug)]
#[command(name = "dbx", version, about, long_about = None)]
struct Cli {
    /// Connection URL: postgres://, mysql://, mssql://, sqlserver:// or sqlite:
    #[arg(long, env = "DATABASE_URL")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tables and views
    Tables,

    /// List the columns of a table in ordinal order
    Columns { table: String },

    /// Resolve keys through a single-row, single-column lookup query
    Map {
        /// Query with exactly one placeholder in the driver's syntax
        #[arg(long)]
        query: String,

        /// Stop at the first key that does not resolve
        #[arg(long)]
        strict: bool,

        /// How keys are bound to the placeholder
        #[arg(long, value_enum, default_value = "text")]
        key_type: KeyType,

        #[arg(required = true)]
        keys: Vec<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum KeyType {
    Text,
    Int,
}

/// A lookup key as given on the command line, typed per `--key-type`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum LookupKey {
    Text(String),
    Int(i64),
}

impl LookupKey {
    fn parse(raw: &str, key_type: KeyType) -> Result<Self> {
        match key_type {
            KeyType::Text => Ok(Self::Text(raw.to_string())),
            KeyType::Int => raw
                .parse()
                .map(Self::Int)
                .with_context(|| format!("key {raw:?} is not an integer")),
        }
    }
}

impl From<LookupKey> for Value {
    fn from(key: LookupKey) -> Self {
        match key {
            LookupKey::Text(s) => Value::Text(s),
            LookupKey::Int(n) => Value::Int64(n),
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,dbx=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    smol::block_on(run(cli))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let conn: Arc<dyn SchemaIntrospection> = Arc::from(open_with_schema(&cli.url).await?);

    match cli.command {
        Command::Tables => {
            for table in tables(conn.as_ref()).await? {
                println!("{}\t{}", table.full_name(), table.table_type);
            }
        }
        Command::Columns { table } => {
            for column in columns(conn.as_ref(), &table).await? {
                println!(
                    "{}\t{}\t{}",
                    column.column_name, column.data_type, column.is_nullable
                );
            }
        }
        Command::Map {
            query,
            strict,
            key_type,
            keys,
        } => {
            let parsed = keys
                .iter()
                .map(|raw| LookupKey::parse(raw, key_type))
                .collect::<Result<Vec<_>>>()?;
            let mapper: StringMapper<LookupKey, dyn SchemaIntrospection> =
                StringMapper::new(conn, query);
            let mut failed = false;

            for (raw, key) in keys.iter().zip(parsed) {
                if strict {
                    let value = mapper.must_map(key).await;
                    println!("{raw}\t{value}");
                    continue;
                }

                match mapper.map(key).await {
                    Ok(value) => println!("{raw}\t{value}"),
                    Err(e) => {
                        eprintln!("{raw}\terror: {e:#}");
                        failed = true;
                    }
                }
            }

            if failed {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
