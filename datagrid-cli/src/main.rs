use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use datagrid_lib::{Cell, InMemoryMetadata, ListViewConfig, ListViewStore, RestResourceClient};
use simplelog::{Config, LevelFilter, WriteLogger};

/// Fetch one page of a list resource and print its rows as JSON lines.
#[derive(Debug, Parser)]
#[command(name = "datagrid", version)]
struct Args {
    /// Resource key to list (e.g. "snippets")
    resource_key: String,

    /// Base URL of the list API
    #[arg(long, env = "DATAGRID_BASE_URL")]
    base_url: String,

    /// Page to load (1-based)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// Content locale
    #[arg(long, env = "DATAGRID_LOCALE")]
    locale: Option<String>,

    /// Page size
    #[arg(long)]
    limit: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// JSON file mapping field names to field definitions; only these
    /// fields are printed
    #[arg(long)]
    fields: Option<PathBuf>,

    /// Select every row of the page and print the selection
    #[arg(long)]
    select_all: bool,

    /// Log file
    #[arg(long, default_value = "datagrid.log")]
    log_file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Datagrid(#[from] datagrid_lib::error::Error),

    #[error("Request failed: {0}")]
    Fetch(String),

    #[error("Failed to encode row: {0}")]
    Encode(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(path: &PathBuf) -> Result<(), CliError> {
    let log_file = File::create(path).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;
    Ok(())
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut builder = RestResourceClient::builder()
        .base_url(&args.base_url)
        .timeout(Duration::from_secs(args.timeout));
    if let Some(limit) = args.limit {
        builder = builder.limit(limit);
    }
    let client = builder.build().map_err(datagrid_lib::error::Error::from)?;

    let metadata = InMemoryMetadata::new();
    if let Some(path) = &args.fields {
        let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        metadata.register_json(&args.resource_key, &json)?;
    }

    let page = Cell::new(None);
    let locale = Cell::new(args.locale.clone());
    let store = ListViewStore::builder(&args.resource_key)
        .config(ListViewConfig::new(page.clone()).with_locale(locale))
        .client(client)
        .metadata(metadata)
        .build()?;

    page.set(Some(args.page));
    store.wait_until_idle().await;

    if let Some(error) = store.last_error() {
        store.destroy();
        return Err(CliError::Fetch(error));
    }

    let fields = store.get_fields();
    for row in store.data() {
        let line = if fields.is_empty() {
            serde_json::to_string(&row)?
        } else {
            let projected: serde_json::Map<_, _> = row
                .fields()
                .iter()
                .filter(|(name, _)| fields.contains_key(*name))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            serde_json::to_string(&projected)?
        };
        println!("{}", line);
    }
    eprintln!("page {} of {}", args.page, store.page_count());

    if args.select_all {
        store.select_entire_page();
        let ids: Vec<String> = store.selections().iter().map(ToString::to_string).collect();
        eprintln!("selected: {}", ids.join(", "));
    }

    store.destroy();
    Ok(())
}
