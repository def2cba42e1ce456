use anyhow::Result;
use clap::Parser;
use docforge_site::{BuildReport, SiteBuilder};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "docforge")]
#[command(about = "Build a documentation site with link and orphan checking")]
#[command(version)]
struct Args {
    /// Input directory holding the document tree
    input: PathBuf,

    /// Output directory for the rendered site
    output: PathBuf,

    /// Write the build report as JSON to this path
    #[arg(long, value_name = "FILE")]
    report_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(failed) => {
            if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let builder = SiteBuilder::new(&args.input, &args.output)?;
    let report = builder.build()?;

    print_report(&report);

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
        log::info!("Report written to {}", path.display());
    }

    Ok(report.failed())
}

fn print_report(report: &BuildReport) {
    for (doc_uri, errors) in &report.file_errors {
        eprintln!("{}:", doc_uri);
        for error in errors {
            eprintln!("  {}", error);
        }
    }
    for path in &report.failed_paths {
        eprintln!("failed to process: {}", path);
    }
    if !report.orphans.documents.is_empty() {
        eprintln!("Orphan documents:");
        for doc in &report.orphans.documents {
            eprintln!("  {}", doc);
        }
    }
    if !report.orphans.files.is_empty() {
        eprintln!("Orphan files:");
        for file in &report.orphans.files {
            eprintln!("  {}", file);
        }
    }

    println!(
        "{} documents rendered, {} files copied",
        report.documents, report.files
    );
}
