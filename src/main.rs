use std::io::{self, Read};
use std::path::Path;

use siterisk::cli::Cli;
use siterisk::config::Config;
use siterisk::errors::{IoResultExt, Result, SiteRiskError};
use siterisk::output::{Labels, create_formatter};
use siterisk::record::ScanRecord;
use siterisk::scanner::{NoProgress, ScanProgress, Scanner, parse_url_list};
use siterisk::structured_output::ScanReport;
use siterisk::styled_output::StyledFormatter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::from_args();
    init_logging(&cli);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        tracing::debug!("error category: {}", e.category());
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    // RUST_LOG wins over --verbose when set.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Handle schema generation early exit
    if cli.generate_schema {
        let schema = ScanReport::generate_json_schema()
            .map_err(|e| SiteRiskError::serialization("json-schema", e))?;
        println!("{schema}");
        return Ok(());
    }

    let mut config = Config::from_env();
    config.merge_with_cli(&cli);
    config.validate().map_err(|e| SiteRiskError::Configuration {
        message: e.to_string(),
    })?;

    let urls = collect_urls(&cli)?;
    if urls.is_empty() {
        return Err(SiteRiskError::NoUrls);
    }
    tracing::info!("Scanning {} URLs", urls.len());

    let scanner = Scanner::from_config(&config.network).map_err(|e| {
        SiteRiskError::Configuration {
            message: e.to_string(),
        }
    })?;

    let labels = Labels::new(config.output.language);
    let session = if cli.show_progress() {
        let stderr_colors = config.output.use_colors != Some(false)
            && atty::is(atty::Stream::Stderr)
            && std::env::var("NO_COLOR").is_err();
        let progress = StyledFormatter::with_colors(labels, stderr_colors);
        let mut reporter = |p: ScanProgress, r: &ScanRecord| {
            eprintln!("{}", progress.format_progress(p, r));
        };
        scanner.scan(&urls, &mut reporter).await
    } else {
        scanner.scan(&urls, &mut NoProgress).await
    };

    let use_colors = config.output.path.is_none()
        && config.output.use_colors != Some(false)
        && StyledFormatter::should_use_colors();
    let formatter = create_formatter(config.output.format, config.output.language, use_colors);
    let rendered = formatter
        .format_session(&session)
        .map_err(|e| SiteRiskError::serialization(formatter.file_extension(), e))?;

    match config.output.path {
        Some(ref path) => {
            std::fs::write(path, rendered).with_path(path.display().to_string(), "write report")?;
            tracing::info!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// URLs from the command line, then `--file` (or stdin when the file is "-"
/// or no URLs were given and stdin is not a terminal).
fn collect_urls(cli: &Cli) -> Result<Vec<String>> {
    let mut urls: Vec<String> = cli
        .urls
        .iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    match cli.file.as_deref() {
        Some(path) if path == Path::new("-") => urls.extend(read_stdin()?),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_path(path.display().to_string(), "read URL list")?;
            urls.extend(parse_url_list(&text));
        }
        None if urls.is_empty() && !atty::is(atty::Stream::Stdin) => urls.extend(read_stdin()?),
        None => {}
    }

    Ok(urls)
}

fn read_stdin() -> Result<Vec<String>> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .with_path("<stdin>", "read URL list")?;
    Ok(parse_url_list(&text))
}
