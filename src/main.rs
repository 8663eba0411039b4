use clap::Parser;
use site_signals::results::risk_label;
use site_signals::{ScanRecord, ScanStatus, Scanner};
use std::process::ExitCode;

mod args;
use args::{Args, OutputFormat};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let scanner = match Scanner::from_config(&config) {
        Ok(scanner) => scanner,
        Err(e) => {
            ::log::error!("Failed to start scanner: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!("Starting scan for: {}", args.url);
    let start_time = std::time::Instant::now();

    let record = match scanner.scan(&args.url).await {
        Ok(record) => record,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Scan finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    match args.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&record) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                ::log::error!("Failed to encode scan record: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Text => print_report(&record),
    }

    if record.status == ScanStatus::Done {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_report(record: &ScanRecord) {
    println!("Scan of {}", record.url);

    let Some(result) = &record.findings else {
        println!(
            "Scan failed: {}",
            record.error.as_deref().unwrap_or("unknown error")
        );
        return;
    };

    println!();
    println!("Score: {}/100 ({})", result.score, risk_label(result.score));
    println!("{}", result.summary);

    if !result.findings.is_empty() {
        println!();
        println!("Findings:");
    }
    for finding in result.findings_by_severity() {
        println!();
        println!(
            "  [{:?}] {} ({:?})",
            finding.severity, finding.title, finding.category
        );
        println!("    {}", finding.description);
        for evidence in &finding.evidence {
            println!("    - {}: \"{}\"", evidence.url, evidence.snippet);
        }
        println!("    Recommendation: {}", finding.recommendation);
    }

    if !result.limitations.is_empty() {
        println!();
        println!("Limitations:");
        for limitation in &result.limitations {
            println!("  - {}", limitation);
        }
    }

    println!();
    println!("These are heuristic signals, not legal advice.");
}
