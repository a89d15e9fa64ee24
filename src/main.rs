//! Main entry point for the charm-bundle CLI application.
//!
//! Opens a charm bundle from the local filesystem and either describes it,
//! lists its archive entries, or expands it into a directory.

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use charm_bundle::{Bundle, Cli, ZipFileEntry};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let bundle =
        Bundle::read(&cli.file).with_context(|| format!("failed to read bundle {}", cli.file))?;

    if cli.prints_listing() {
        let archive = bundle.archive()?;
        list_entries(archive.entries(), cli.verbose);
    } else if cli.prints_description() {
        describe(&bundle);
    }

    if let Some(dir) = &cli.expand_dir {
        expand(&bundle, dir, cli.quiet)?;
    }

    Ok(())
}

/// Print the charm's name, relations and configuration options.
fn describe(bundle: &Bundle) {
    let meta = bundle.meta();
    println!("{}", meta.name);
    if !meta.summary.is_empty() {
        println!("  {}", meta.summary);
    }
    if meta.subordinate {
        println!("  (subordinate)");
    }

    for (role, relations) in [
        ("provides", &meta.provides),
        ("requires", &meta.requires),
        ("peers", &meta.peers),
    ] {
        if relations.is_empty() {
            continue;
        }
        println!("{}:", role);
        for (name, rel) in relations {
            let optional = if rel.optional { " (optional)" } else { "" };
            println!("  {:<20} {}{}", name, rel.interface, optional);
        }
    }

    let config = bundle.config();
    if !config.options.is_empty() {
        let defaults = config.defaults();
        println!("options:");
        for (name, opt) in &config.options {
            match defaults.get(name.as_str()) {
                Some(value) => {
                    let value = serde_yaml::to_string(value).unwrap_or_default();
                    println!("  {:<20} {:<8} {}", name, opt.option_type, value.trim_end());
                }
                None => println!("  {:<20} {}", name, opt.option_type),
            }
        }
    }
}

/// List archive entries.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just entry names, one per line
/// - Verbose format (`-l -v`): Table with size, method and timestamps
fn list_entries(entries: &[ZipFileEntry], verbose: bool) {
    if !verbose {
        for entry in entries {
            println!("{}", entry.file_name);
        }
        return;
    }

    println!(
        "{:>10}  {:>6}  {:>10}  {:>10}  {:>5}  Name",
        "Length", "Method", "Size", "Date", "Time"
    );
    println!("{}", "-".repeat(70));

    let mut total_uncompressed = 0u64;
    let mut file_count = 0usize;

    for entry in entries {
        let (year, month, day) = entry.mod_date();
        let (hour, minute, _second) = entry.mod_time();
        println!(
            "{:>10}  {:>6}  {:>10}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.uncompressed_size,
            entry.compression_method.name(),
            entry.compressed_size,
            year,
            month,
            day,
            hour,
            minute,
            entry.file_name
        );

        if !entry.is_directory {
            total_uncompressed += entry.uncompressed_size;
            file_count += 1;
        }
    }

    println!("{}", "-".repeat(70));
    println!("{:>10}  {:>42}  {} files", total_uncompressed, "", file_count);
}

/// Expand the bundle, reporting every entry that could not be written.
fn expand(bundle: &Bundle, dir: &str, quiet: bool) -> Result<()> {
    let report = bundle
        .expand_to_with_report(dir)
        .with_context(|| format!("failed to expand into {}", dir))?;

    for failure in &report.failures {
        eprintln!("error: {}", failure);
    }

    if !quiet {
        println!(
            "expanded {} into {}: {} files, {} directories",
            bundle.meta().name,
            dir,
            report.files,
            report.directories
        );
    }

    if !report.is_complete() {
        bail!("{} entries failed to expand", report.failures.len());
    }
    Ok(())
}
