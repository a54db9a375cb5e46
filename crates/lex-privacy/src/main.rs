//! CLI entry point for k-anonymity measurement and generalization.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use lex_privacy::io::{decode_text, read_csv_file};
use lex_privacy::utils::truncate_str;
use lex_privacy::{
    AnonymizationConfig, AnonymizationConfigBuilder, AnonymizationReport, AnonymizationSummary,
    Anonymizer, PiiFinding, ReportGenerator, find_pii, scan_dataframe,
};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Rows shown in the before/after previews.
const PREVIEW_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "k-Anonymity Data Anonymization",
    long_about = "Measures the k-anonymity of a CSV dataset over chosen quasi-identifier \
                  columns and, if it falls short of the target, generalizes those columns once.\n\n\
                  EXAMPLES:\n  \
                  # Anonymize over Age and Pincode with k = 3\n  \
                  lex-privacy -i people.csv -q Age -q Pincode -k 3\n\n  \
                  # Keep postal codes as text so they are masked, not bucketed\n  \
                  lex-privacy -i people.csv -q Pincode --text-column Pincode\n\n  \
                  # Only report the current k\n  \
                  lex-privacy -i people.csv -q Age --dry-run\n\n  \
                  # Look for PII columns first\n  \
                  lex-privacy -i people.csv --scan-pii"
)]
struct Args {
    /// Path to the CSV file to anonymize (a .txt file is scanned for PII only)
    #[arg(short, long)]
    input: String,

    /// Quasi-identifier column (repeat for several)
    #[arg(short = 'q', long = "quasi-identifier")]
    quasi_identifiers: Vec<String>,

    /// Desired k (at least 2)
    ///
    /// Defaults to 3, or to the value in --config
    #[arg(short = 'k', long)]
    target_k: Option<usize>,

    /// Column to read as text instead of inferring its type (repeat for several)
    ///
    /// Use this for postal codes and other digit strings with leading zeros
    #[arg(long = "text-column")]
    text_columns: Vec<String>,

    /// Output directory for the anonymized dataset and reports
    #[arg(short, long)]
    output: Option<String>,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses "anonymized_data"
    #[arg(long)]
    output_name: Option<String>,

    /// JSON configuration file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scan columns for PII (emails, phone numbers, IDs, cards, IP addresses)
    ///
    /// Without quasi-identifiers, only the scan is performed
    #[arg(long)]
    scan_pii: bool,

    /// Measure k and report without generalizing or writing files
    #[arg(long)]
    dry_run: bool,

    /// Do not write the anonymized dataset to disk
    #[arg(long)]
    no_save: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env first so RUST_LOG can come from it
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    if is_text_input(&args.input) {
        return run_text_scan(&args);
    }

    let config = build_config(&args)?;

    let data = read_csv_file(&args.input, config.text_columns.as_slice())?;

    let pii_findings = if args.scan_pii {
        let findings = scan_dataframe(&data, config.pii_sample_rows)?;
        if !args.json {
            print_pii_findings(&findings);
        }
        findings
    } else {
        Vec::new()
    };

    if config.quasi_identifiers.is_empty() {
        if args.scan_pii {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&pii_findings)?);
            }
            return Ok(());
        }
        return Err(anyhow!(
            "Please select at least one quasi-identifier column (-q <COLUMN>)"
        ));
    }

    let anonymizer = Anonymizer::new(config)?;

    if let Err(e) = anonymizer.validate_input(&data) {
        error!("{}", e);
        if e.is_input_error() {
            eprintln!("Available columns: {:?}", data.get_column_names());
        }
        return Err(e.into());
    }

    if args.dry_run {
        return run_dry_run(&args, &anonymizer, &data, &pii_findings);
    }

    run_anonymization(&args, &anonymizer, &data, &pii_findings)
}

fn is_text_input(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// Merge the optional JSON config file with command line flags.
fn build_config(args: &Args) -> Result<AnonymizationConfig> {
    let base = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config {}", path.display()))?;
            let config: AnonymizationConfig = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        None => AnonymizationConfig::default(),
    };

    let mut builder = AnonymizationConfigBuilder::from_config(base);

    if !args.quasi_identifiers.is_empty() {
        builder = builder.quasi_identifiers(args.quasi_identifiers.iter().map(|s| s.trim()));
    }
    if let Some(k) = args.target_k {
        builder = builder.target_k(k);
    }
    if !args.text_columns.is_empty() {
        builder = builder.text_columns(args.text_columns.iter().cloned());
    }
    if let Some(ref output) = args.output {
        builder = builder.output_dir(output);
    }
    if let Some(ref name) = args.output_name {
        builder = builder.output_name(name);
    }
    if args.no_save || args.dry_run {
        builder = builder.save_to_disk(false);
    }

    Ok(builder.build()?)
}

/// Scan an unstructured text file for PII.
fn run_text_scan(args: &Args) -> Result<()> {
    let bytes = std::fs::read(&args.input)?;
    let text = decode_text(&bytes);
    let matches = find_pii(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("PII SCAN - Unstructured text: {}", args.input);
    println!("{}\n", "=".repeat(80));

    if matches.is_empty() {
        println!("  No PII detected in this text.");
    } else {
        for m in &matches {
            println!("  [{:<12}] {} (bytes {}..{})", m.kind.display_name(), m.value, m.start, m.end);
        }
    }
    println!();
    Ok(())
}

/// Print PII findings for a structured dataset.
///
/// Uses `println!` intentionally: this is user-facing output, not logging.
fn print_pii_findings(findings: &[PiiFinding]) {
    println!("\nDETECTED PII FIELDS");
    println!("{}", "-".repeat(40));
    if findings.is_empty() {
        println!("  No PII detected in this dataset.");
    } else {
        for finding in findings {
            let kinds: Vec<&str> = finding.kinds.iter().map(|k| k.display_name()).collect();
            println!("  {:<20} -> {}", truncate_str(&finding.column, 19), kinds.join(", "));
        }
    }
    println!();
}

/// Measure k and show what a run would do, without changing anything.
fn run_dry_run(
    args: &Args,
    anonymizer: &Anonymizer,
    data: &DataFrame,
    pii_findings: &[PiiFinding],
) -> Result<()> {
    let summary = anonymizer.measure(data)?;

    if args.json {
        let report = ReportGenerator::build_report(
            &args.input,
            None,
            &summary,
            &anonymizer.config().quasi_identifiers,
            pii_findings,
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - k-anonymity measurement");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", summary.rows);
    println!("  Columns: {}", summary.columns);
    println!();

    print_column_table(&summary);

    println!("K-ANONYMITY");
    println!("{}", "-".repeat(40));
    println!("  Current k: {}", summary.k_before);
    println!("  Target k: {}", summary.target_k);
    println!("  Equivalence classes: {}", summary.classes_before);
    println!(
        "  Records in classes smaller than {}: {}",
        summary.target_k, summary.records_at_risk_before
    );
    if summary.target_met {
        println!("  Dataset already satisfies {}-anonymity; no generalization needed", summary.target_k);
    } else {
        println!("  Dataset does NOT satisfy {}-anonymity; generalization would be applied", summary.target_k);
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("To anonymize, run without --dry-run");
    println!("{}", "=".repeat(80));
    Ok(())
}

fn print_column_table(summary: &AnonymizationSummary) {
    println!("QUASI-IDENTIFIERS");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<10} {:<10} {:<10} {:<10}",
        "Column", "Type", "Distinct", "New Type", "Distinct"
    );
    println!("{}", "-".repeat(64));
    for col in &summary.column_summaries {
        println!(
            "{:<20} {:<10} {:<10} {:<10} {:<10}",
            truncate_str(&col.column, 19),
            col.dtype_before,
            col.distinct_before,
            col.dtype_after,
            col.distinct_after
        );
    }
    println!();
}

/// Run anonymization and handle its output.
fn run_anonymization(
    args: &Args,
    anonymizer: &Anonymizer,
    data: &DataFrame,
    pii_findings: &[PiiFinding],
) -> Result<()> {
    info!("{}", "=".repeat(80));
    info!("Applying k-anonymization...");
    info!("{}", "=".repeat(80));

    let outcome = match anonymizer.process(data) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Anonymization failed: {}", e);
            return Err(anyhow!("Anonymization failed: {}", e));
        }
    };

    let config = anonymizer.config();
    let output_file = if config.save_to_disk {
        let generator = ReportGenerator::new(
            config.output_dir.clone(),
            Some(config.output_file_name().to_string()),
        );
        Some(generator.write_dataset(&outcome.result.anonymized)?)
    } else {
        None
    };
    let output_file = output_file.map(|p| p.to_string_lossy().into_owned());

    let report = ReportGenerator::build_report(
        &args.input,
        output_file.as_deref(),
        &outcome.summary,
        &outcome.result.quasi_identifiers,
        pii_findings,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let generator = ReportGenerator::new(config.output_dir.clone(), None);
        let report_path = generator.write_report_to_file(&report, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report, &outcome.result.original, &outcome.result.anonymized);
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn print_human_readable_summary(
    report: &AnonymizationReport,
    original: &DataFrame,
    anonymized: &DataFrame,
) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("K-ANONYMIZATION COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, summary.rows, summary.columns
    );
    if let Some(ref output_file) = report.output_file {
        println!("Output: {}", output_file);
    }
    println!("Quasi-identifiers: {}", report.quasi_identifiers.join(", "));
    println!();

    println!("Current dataset k = {}", report.k_before);
    if !report.generalization_applied {
        println!("Dataset already satisfies {}-anonymity.", report.target_k);
        println!();
        println!("{}", original.head(Some(PREVIEW_ROWS)));
    } else {
        println!("Dataset did NOT satisfy {}-anonymity; generalization applied.", report.target_k);
        println!("After generalization, new k = {}", report.k_after);
        if report.target_met {
            println!("Target {}-anonymity reached.", report.target_k);
        } else {
            println!(
                "Target {}-anonymity NOT reached ({} record(s), {:.1}%, still in smaller classes).",
                report.target_k,
                summary.records_at_risk_after,
                summary.records_at_risk_percentage()
            );
        }
        println!();

        print_column_table(summary);

        println!("Before anonymization:");
        println!("{}", original.head(Some(PREVIEW_ROWS)));
        println!();
        println!("After anonymization:");
        println!("{}", anonymized.head(Some(PREVIEW_ROWS)));
    }
    println!();

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    if report.output_file.is_none() {
        warn!("Anonymized dataset was not written to disk");
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}
