use chrono::{Datelike, Local};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cast_ages::{
    AppError, Pipeline, Result,
    cli::parse_args,
    client::HttpClient,
    config::Config,
    lookup::{OmdbCastResolver, TheaterListing, WikipediaAgeResolver},
    report,
};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Bad arguments must fail before any request goes out
    let options = parse_args(std::env::args().skip(1))?;
    let config = Config::load()?;
    let client = HttpClient::new(&config)?;

    if options.verbose {
        println!("Gathering currently playing movies...");
    }
    let titles = TheaterListing::new(&client, &config)
        .now_playing()
        .map_err(|e| {
            AppError::FetchError(format!("Unable to fetch currently playing movies: {}", e))
        })?;
    info!(count = titles.len(), "now playing");

    let year = Local::now().year();
    let cast = OmdbCastResolver::new(&client, &config);
    let ages = WikipediaAgeResolver::new(&client, &config, year);
    let averages = Pipeline::new(&cast, &ages)
        .verbose(options.verbose)
        .aggregate(&titles, year);

    if options.verbose {
        println!("Generating PDF of the results...");
    }
    let font = config.chart_font.as_deref();
    let path = report::render(&averages, &options.pdf_name, font)?;
    info!(path = %path.display(), movies = averages.len(), "chart written");

    Ok(())
}
