//! Command line front end for the harlens engine.
//!
//! Imports a HAR file, prints the log summary and the entries table, and
//! optionally runs a global search over it.
//!
//! Usage:
//! ```
//! cargo run --bin harlens -- capture.har --search token --sort status
//! ```

use std::path::PathBuf;

use harlens::config::ViewerConfig;
use harlens::logging::init_logging;
use harlens::search::{GlobalSearch, SearchOutcome};
use harlens::storage::HarSession;
use harlens::table::{Column, EntryTable, SortOrder};

struct CliArgs {
    file: Option<PathBuf>,
    search: Option<String>,
    case_sensitive: bool,
    saml: bool,
    config: Option<PathBuf>,
    sort: Option<(Column, SortOrder)>,
}

const ROW_COLUMNS: [Column; 5] = [
    Column::Method,
    Column::Status,
    Column::Protocol,
    Column::MimeType,
    Column::Url,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = parse_args();

    let Some(file) = args.file.clone() else {
        print_usage();
        std::process::exit(2);
    };

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path).unwrap_or_else(|err| {
            tracing::warn!("Using default configuration: {:#}", err);
            ViewerConfig::default()
        }),
        None => ViewerConfig::default(),
    };
    if args.case_sensitive {
        config.case_sensitive_matching = true;
    }
    if args.saml {
        config.experimental_saml = true;
    }

    let session = HarSession::new();
    let mut report = |processed: usize, total: usize| {
        tracing::debug!("Processing entries: {}/{}", processed, total);
    };
    let store = session.open_async(&file, &config, &mut report).await?;

    let summary = store.summary();
    println!("HAR {} ({} entries)", summary.version, summary.entry_count);
    println!("Creator: {} {}", summary.creator_name, summary.creator_version);
    println!("Browser: {} {}", summary.browser_name, summary.browser_version);
    println!();

    let mut table = EntryTable::from_store(&store);
    if let Some((column, order)) = args.sort {
        table.sort_by(&store, column, order);
    }

    for (row, id) in table.rows().iter().enumerate() {
        if let Some(entry) = store.get(id) {
            let cells: Vec<String> = ROW_COLUMNS
                .iter()
                .map(|column| column.cell_text(entry))
                .collect();
            println!("{:>5}  {}", row, cells.join("  "));
        }
    }

    if let Some(query) = &args.search {
        let outcome = GlobalSearch::search_with(&store, &table, query, &config);
        println!();
        match &outcome {
            SearchOutcome::Matches(set) => {
                println!("{}", outcome.status_message());
                for hit in set.matches() {
                    let url = store
                        .get(&hit.id)
                        .map(|entry| entry.request.url.as_str())
                        .unwrap_or_default();
                    println!("{:>5}  {}", hit.row, url);
                }
            }
            _ => println!("{}", outcome.status_message()),
        }
    }

    Ok(())
}

fn parse_args() -> CliArgs {
    let mut args = std::env::args().skip(1);
    let mut parsed = CliArgs {
        file: None,
        search: None,
        case_sensitive: false,
        saml: false,
        config: None,
        sort: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--search" => {
                if let Some(query) = args.next() {
                    parsed.search = Some(query);
                }
            }
            "--case-sensitive" => {
                parsed.case_sensitive = true;
            }
            "--saml" => {
                parsed.saml = true;
            }
            "--config" => {
                if let Some(path) = args.next() {
                    parsed.config = Some(PathBuf::from(path));
                }
            }
            "--sort" => {
                if let Some(spec) = args.next() {
                    parsed.sort = parse_sort(&spec);
                    if parsed.sort.is_none() {
                        eprintln!("Unknown sort column: {spec}");
                    }
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown argument: {other}");
            }
            _ => {
                parsed.file = Some(PathBuf::from(arg));
            }
        }
    }

    parsed
}

/// `status`, `status:desc` or `status:asc`
fn parse_sort(spec: &str) -> Option<(Column, SortOrder)> {
    let (name, order) = match spec.rsplit_once(':') {
        Some((name, "desc")) => (name, SortOrder::Descending),
        Some((name, "asc")) => (name, SortOrder::Ascending),
        _ => (spec, SortOrder::Ascending),
    };
    Column::from_name(name).map(|column| (column, order))
}

fn print_usage() {
    eprintln!("harlens {}", harlens::VERSION);
    eprintln!();
    eprintln!("Usage: harlens <FILE> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --search <QUERY>        Search every entry and list matching rows");
    eprintln!("  --case-sensitive        Match the query case-sensitively");
    eprintln!("  --saml                  Decode SAML requests and responses");
    eprintln!("  --config <PATH>         Viewer settings file (JSON)");
    eprintln!("  --sort <COLUMN[:desc]>  Sort the table, e.g. status:desc");
    eprintln!("  --help, -h              Show this help");
}
