use std::path::PathBuf;

use clap::Parser;
use gab_lint::{lint_directory, DirectoryReport, Severity};
use log::info;

#[derive(Debug, Parser)]
#[command(name = "gab-lint")]
#[command(about = "Lint gab dialogue scripts")]
struct Cli {
    #[arg(long = "scripts-dir")]
    scripts_dir: PathBuf,
    /// Start node for the files that define it; other files use their first node.
    #[arg(long = "start")]
    start: Option<String>,
    #[arg(long = "regions")]
    regions: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let report = match lint_directory(
        &cli.scripts_dir,
        cli.start.as_deref(),
        cli.regions.as_deref(),
    ) {
        Ok(report) => report,
        Err(error) => {
            eprintln!("error[{}]: {}", error.code, error.message);
            std::process::exit(2);
        }
    };

    print_report(&report);
    std::process::exit(if report.has_errors() { 1 } else { 0 });
}

fn print_report(report: &DirectoryReport) {
    let mut errors = 0;
    let mut warnings = 0;
    for file in &report.files {
        errors += file.report.count(Severity::Error);
        warnings += file.report.count(Severity::Warning);
        for finding in &file.report.findings {
            println!(
                "{}:{}: {}[{}]: {}",
                file.path,
                finding.line.unwrap_or(1),
                finding.severity.as_str(),
                finding.code,
                finding.message
            );
        }
    }
    for region in &report.regions {
        errors += region.errors.len();
        for message in &region.errors {
            println!(
                "{}[{}]: error[LINT_EXAMINE_REGION]: {}",
                region.room, region.index, message
            );
        }
    }
    info!("{} error(s), {} warning(s)", errors, warnings);
}
