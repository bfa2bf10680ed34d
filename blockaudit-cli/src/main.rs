//! blockaudit CLI - block usage and content search reports for CMS page
//! trees.
//!
//! Subcommands:
//! - `block-usage`: every declared block path with occurrence, page, live
//!   and default-site counts
//! - `page-search`: every page field and block matching a regular expression
//!
//! Defaults may be set in `blockaudit.toml` in the working directory;
//! command-line arguments win.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};

use blockaudit_core::{
    init_structured_logging, load_config, log_info, log_warn, page_types_and_fields,
    parse_selectors, print_json, print_search_plain, print_usage_plain, report_json,
    write_search_csv, write_usage_csv, AuditConfig, BlockUsageQuery, ContentSnapshot,
    OutputFormat, PageRegistry, PageSearchQuery, SearchRow, UsageRow,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Block usage and content search reports for CMS page trees")]
pub struct Cli {
    /// Content snapshot (JSON export) to audit
    #[arg(long, global = true, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Output format: csv, plain or json
    #[arg(long, global = true)]
    format: Option<String>,

    /// Output results in JSON format (same as --format json)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report how every block path declared by stream field schemas is used
    BlockUsage {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Search page fields for a string or regular expression
    PageSearch {
        /// The search string to match; may be a regular expression
        #[arg(short, long)]
        search: String,

        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct ReportArgs {
    /// Page type and field to report on, as app_label.Model.field (repeatable)
    #[arg(short = 'p', long = "pagetype", value_name = "APP.MODEL.FIELD")]
    pagetypes: Vec<String>,

    /// Skip this many rows
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Return at most this many rows
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();
    let config = load_config(Path::new("."))?.unwrap_or_default();

    let format = resolve_format(&cli, &config)?;
    let snapshot = resolve_snapshot(&cli, &config)?;
    let store = ContentSnapshot::load(&snapshot)
        .with_context(|| format!("Failed to load snapshot: {}", snapshot.display()))?;

    match &cli.command {
        Command::BlockUsage { report } => {
            let mut query = BlockUsageQuery::new().offset(report.offset);
            if let Some(limit) = report.limit {
                query = query.limit(limit);
            }
            for (page_type, field) in selected_pairs(&store, report, &config)? {
                query = query.filter_page_type(page_type).filter_field(field);
            }

            let rows: Vec<UsageRow> = query.run(&store)?.iter().map(UsageRow::from).collect();
            log_info(&format!("Block usage report: {} rows", rows.len()));

            match format {
                OutputFormat::Csv => write_usage_csv(io::stdout().lock(), &rows)?,
                OutputFormat::Plain => print_usage_plain(&rows),
                OutputFormat::Json => print_json(&report_json("block-usage", &rows)),
            }
        }
        Command::PageSearch { search, report } => {
            let mut query = PageSearchQuery::new()
                .filter_search(search.as_str())
                .offset(report.offset);
            if let Some(limit) = report.limit {
                query = query.limit(limit);
            }
            for (page_type, field) in selected_pairs(&store, report, &config)? {
                query = query.filter_page_type(page_type).filter_field(field);
            }

            let rows: Vec<SearchRow> = query.run(&store)?.iter().map(SearchRow::from).collect();
            log_info(&format!("Page search report: {} matches", rows.len()));

            match format {
                OutputFormat::Csv => write_search_csv(io::stdout().lock(), &rows)?,
                OutputFormat::Plain => print_search_plain(&rows),
                OutputFormat::Json => print_json(&report_json("page-search", &rows)),
            }
        }
    }

    Ok(())
}

/// `--json` beats `--format`, which beats the config file.
fn resolve_format(cli: &Cli, config: &AuditConfig) -> Result<OutputFormat> {
    if cli.json {
        return Ok(OutputFormat::Json);
    }
    if let Some(format) = &cli.format {
        return format.parse();
    }
    Ok(config.output_format()?.unwrap_or_default())
}

fn resolve_snapshot(cli: &Cli, config: &AuditConfig) -> Result<PathBuf> {
    cli.snapshot
        .clone()
        .or_else(|| config.snapshot.as_ref().map(PathBuf::from))
        .ok_or_else(|| {
            anyhow!("No snapshot given; pass --snapshot or set `snapshot` in blockaudit.toml")
        })
}

/// Resolves `-p` selectors (or the configured defaults) to
/// `(page type, field)` name pairs. No selectors at all means no filtering.
fn selected_pairs<R: PageRegistry>(
    registry: &R,
    report: &ReportArgs,
    config: &AuditConfig,
) -> Result<Vec<(String, String)>> {
    let args: &[String] = if !report.pagetypes.is_empty() {
        &report.pagetypes
    } else {
        config.pagetypes.as_deref().unwrap_or_default()
    };
    if args.is_empty() {
        return Ok(Vec::new());
    }

    let selectors = parse_selectors(args)?;
    let pairs: Vec<(String, String)> = page_types_and_fields(registry, Some(selectors.as_slice()))
        .into_iter()
        .map(|(pt, field)| (pt.dotted_name(), field.name.clone()))
        .collect();

    if pairs.len() < selectors.len() {
        log_warn(&format!(
            "{} of {} page type selectors matched no field",
            selectors.len() - pairs.len(),
            selectors.len()
        ));
    }
    if pairs.is_empty() {
        bail!("None of the page type selectors match a known field: {}", args.join(", "));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockaudit_core::OutputConfig;

    const FIXTURE: &str = include_str!("../../blockaudit-core/fixtures/testapp.json");

    fn fixture() -> ContentSnapshot {
        ContentSnapshot::from_json_str(FIXTURE, Path::new("testapp.json")).unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn report(pagetypes: &[&str]) -> ReportArgs {
        ReportArgs {
            pagetypes: pagetypes.iter().map(|p| p.to_string()).collect(),
            ..ReportArgs::default()
        }
    }

    // --- argument parsing TESTS ---

    #[test]
    fn test_parse_block_usage() {
        let cli = parse(&[
            "blockaudit",
            "block-usage",
            "-p",
            "testapp.SearchTestPage.streamfield_with_list",
            "--pagetype",
            "testapp.SearchTestPage.text",
            "--limit",
            "5",
            "--snapshot",
            "content.json",
        ]);
        let Command::BlockUsage { report } = &cli.command else {
            panic!("expected block-usage");
        };
        assert_eq!(report.pagetypes.len(), 2);
        assert_eq!(report.offset, 0);
        assert_eq!(report.limit, Some(5));
        assert_eq!(cli.snapshot, Some(PathBuf::from("content.json")));
    }

    #[test]
    fn test_page_search_requires_search() {
        assert!(Cli::try_parse_from(["blockaudit", "page-search"]).is_err());

        let cli = parse(&["blockaudit", "page-search", "-s", "Test", "--offset", "2"]);
        let Command::PageSearch { search, report } = &cli.command else {
            panic!("expected page-search");
        };
        assert_eq!(search, "Test");
        assert_eq!(report.offset, 2);
    }

    // --- resolve_format TESTS ---

    #[test]
    fn test_format_precedence() {
        let config = AuditConfig {
            output: Some(OutputConfig {
                format: Some("plain".to_string()),
            }),
            ..AuditConfig::default()
        };

        let cli = parse(&["blockaudit", "block-usage"]);
        assert_eq!(resolve_format(&cli, &AuditConfig::default()).unwrap(), OutputFormat::Csv);
        assert_eq!(resolve_format(&cli, &config).unwrap(), OutputFormat::Plain);

        let cli = parse(&["blockaudit", "--format", "csv", "block-usage"]);
        assert_eq!(resolve_format(&cli, &config).unwrap(), OutputFormat::Csv);

        let cli = parse(&["blockaudit", "block-usage", "--format", "plain", "--json"]);
        assert_eq!(resolve_format(&cli, &config).unwrap(), OutputFormat::Json);

        let cli = parse(&["blockaudit", "block-usage", "--format", "xml"]);
        assert!(resolve_format(&cli, &config).is_err());
    }

    // --- resolve_snapshot TESTS ---

    #[test]
    fn test_snapshot_falls_back_to_config() {
        let config = AuditConfig {
            snapshot: Some("from-config.json".to_string()),
            ..AuditConfig::default()
        };
        let cli = parse(&["blockaudit", "block-usage"]);
        assert_eq!(
            resolve_snapshot(&cli, &config).unwrap(),
            PathBuf::from("from-config.json")
        );
        assert!(resolve_snapshot(&cli, &AuditConfig::default()).is_err());

        let cli = parse(&["blockaudit", "block-usage", "--snapshot", "cli.json"]);
        assert_eq!(resolve_snapshot(&cli, &config).unwrap(), PathBuf::from("cli.json"));
    }

    // --- selected_pairs TESTS ---

    #[test]
    fn test_no_selectors_means_no_filter() {
        let store = fixture();
        let pairs = selected_pairs(&store, &report(&[]), &AuditConfig::default()).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_selectors_resolve_to_names() {
        let store = fixture();
        let pairs = selected_pairs(
            &store,
            &report(&["testapp.SearchTestPage.text"]),
            &AuditConfig::default(),
        )
        .unwrap();
        assert_eq!(
            pairs,
            vec![("testapp.SearchTestPage".to_string(), "text".to_string())]
        );
    }

    #[test]
    fn test_config_selectors_used_when_no_flags() {
        let store = fixture();
        let config = AuditConfig {
            pagetypes: Some(vec!["testapp.SearchTestPage.streamfield_with_block".to_string()]),
            ..AuditConfig::default()
        };
        let pairs = selected_pairs(&store, &report(&[]), &config).unwrap();
        assert_eq!(pairs[0].1, "streamfield_with_block");
    }

    #[test]
    fn test_unmatched_or_malformed_selectors_fail() {
        let store = fixture();
        let config = AuditConfig::default();
        assert!(selected_pairs(&store, &report(&["testapp.Missing.text"]), &config).is_err());
        assert!(selected_pairs(&store, &report(&["not-a-selector"]), &config).is_err());
    }
}
