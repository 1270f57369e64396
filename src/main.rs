// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use review_summarize::utils::logging::{
    format_heading, format_info, format_rank, format_success, format_warning,
};
use review_summarize::{
    BusinessSentimentSummary, Config, ElasticsearchStore, GeoPoint, GeoSearchResults,
    HttpSentimentOracle, JsonExporter, MapThesaurus, NoThesaurus, NormalizationConfig, Outcome,
    QueryProgress, SummaryOrchestrator, TextSearchResults, Thesaurus, UserSummary, Validator,
};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

const PREVIEW_CHARS: usize = 200;

#[derive(Parser)]
#[command(name = "review_summarize")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Ranked summaries of business reviews backed by Elasticsearch", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml",
        global = true
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,

    /// Also write the result as JSON into this directory
    #[arg(long, value_name = "DIR", global = true)]
    export: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search business names, and review text for multi-word phrases
    Search {
        #[arg(required = true, num_args = 1..)]
        phrase: Vec<String>,
    },

    /// Businesses inside a bounding box
    Geo {
        #[arg(value_name = "TOP_LAT", allow_hyphen_values = true)]
        top_lat: String,
        #[arg(value_name = "TOP_LON", allow_hyphen_values = true)]
        top_lon: String,
        #[arg(value_name = "BOTTOM_LAT", allow_hyphen_values = true)]
        bottom_lat: String,
        #[arg(value_name = "BOTTOM_LON", allow_hyphen_values = true)]
        bottom_lon: String,
    },

    /// Review summary for one user
    User { user_id: String },

    /// Sentiment summary for a business, looked up by name
    Business {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
}

/// A command whose arguments passed validation.
#[derive(Debug, PartialEq)]
enum Request {
    Search(String),
    Geo(GeoPoint, GeoPoint),
    User(String),
    Business(String),
}

impl Request {
    fn from_command(command: Commands) -> review_summarize::Result<Self> {
        match command {
            Commands::Search { phrase } => {
                let phrase = phrase.join(" ");
                Validator::validate_query_not_empty(&phrase)?;
                Ok(Request::Search(phrase))
            }
            Commands::Geo {
                top_lat,
                top_lon,
                bottom_lat,
                bottom_lon,
            } => {
                let (top_left, bottom_right) =
                    Validator::parse_geo_args(&[top_lat, top_lon, bottom_lat, bottom_lon])?;
                Ok(Request::Geo(top_left, bottom_right))
            }
            Commands::User { user_id } => {
                Validator::validate_identifier("user id", &user_id)?;
                Ok(Request::User(user_id.trim().to_string()))
            }
            Commands::Business { name } => {
                let name = name.join(" ");
                Validator::validate_query_not_empty(&name)?;
                Ok(Request::Business(name))
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    review_summarize::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    // Bad arguments are reported before any connection is attempted
    let request = Request::from_command(cli.command).context("Invalid arguments")?;

    let orchestrator = build_orchestrator(&config).await?;

    let exporter = match &cli.export {
        Some(dir) => Some(JsonExporter::new(dir).context("Failed to create export directory")?),
        None => None,
    };

    match request {
        Request::Search(phrase) => {
            cmd_search(&orchestrator, &phrase, cli.color, exporter.as_ref()).await
        }
        Request::Geo(top_left, bottom_right) => {
            cmd_geo(
                &orchestrator,
                top_left,
                bottom_right,
                cli.color,
                exporter.as_ref(),
            )
            .await
        }
        Request::User(user_id) => {
            cmd_user(&orchestrator, &user_id, cli.color, exporter.as_ref()).await
        }
        Request::Business(name) => {
            cmd_business(&orchestrator, &name, cli.color, exporter.as_ref()).await
        }
    }
}

/// Draws a spinner only when stderr is a terminal.
fn progress(message: &str, color: bool) -> QueryProgress {
    if std::io::stderr().is_terminal() {
        QueryProgress::start(message, color)
    } else {
        QueryProgress::hidden()
    }
}

async fn build_orchestrator(config: &Config) -> Result<SummaryOrchestrator> {
    let store = Arc::new(
        ElasticsearchStore::new(&config.store).context("Failed to create document store client")?,
    );

    if !store.ping().await? {
        error!("Cannot connect to document store at {}", store.endpoint());
        return Err(anyhow::anyhow!("Document store connection failed"));
    }

    let oracle = Arc::new(
        HttpSentimentOracle::new(&config.classifier)
            .context("Failed to create sentiment classifier client")?,
    );

    let thesaurus: Arc<dyn Thesaurus> = match &config.synonyms.path {
        Some(path) => Arc::new(
            MapThesaurus::from_json_file(path).context("Failed to load synonym thesaurus")?,
        ),
        None => {
            info!("No synonym thesaurus configured, searches use the phrase as given");
            Arc::new(NoThesaurus)
        }
    };

    let normalization = Arc::new(NormalizationConfig::with_extra_stopwords(
        &config.analysis.extra_stopwords,
    ));

    Ok(SummaryOrchestrator::new(
        config,
        store,
        oracle,
        thesaurus,
        normalization,
    ))
}

async fn cmd_search(
    orchestrator: &SummaryOrchestrator,
    phrase: &str,
    color: bool,
    exporter: Option<&JsonExporter>,
) -> Result<()> {
    let mut progress = progress(&format!("Searching for \"{}\"", phrase), color);
    let results = orchestrator
        .text_search(phrase)
        .await
        .context("Text search failed")?;
    let stats = progress.finish(results.businesses.len() + results.reviews.len());
    info!("Finished: {}", stats.summary_line());

    print_search_results(&results);
    export(exporter, "search", &results)
}

async fn cmd_geo(
    orchestrator: &SummaryOrchestrator,
    top_left: GeoPoint,
    bottom_right: GeoPoint,
    color: bool,
    exporter: Option<&JsonExporter>,
) -> Result<()> {
    let mut progress = progress("Searching bounding box", color);
    let results = orchestrator
        .geo_search(top_left, bottom_right)
        .await
        .context("Geo search failed")?;
    let stats = progress.finish(results.businesses.len());
    info!("Finished: {}", stats.summary_line());

    print_geo_results(&results);
    export(exporter, "geo", &results)
}

async fn cmd_user(
    orchestrator: &SummaryOrchestrator,
    user_id: &str,
    color: bool,
    exporter: Option<&JsonExporter>,
) -> Result<()> {
    let mut progress = progress(&format!("Summarizing reviews by {}", user_id), color);
    let outcome = orchestrator
        .user_review_summary(user_id)
        .await
        .context("User review summary failed")?;
    let stats = progress.finish(usize::from(outcome.is_ready()));
    info!("Finished: {}", stats.summary_line());

    match outcome {
        Outcome::Ready(summary) => {
            print_user_summary(&summary);
            export(exporter, "user_summary", &summary)
        }
        Outcome::NotFound(message) | Outcome::Empty(message) => {
            println!("{}", format_warning(&message));
            Ok(())
        }
    }
}

async fn cmd_business(
    orchestrator: &SummaryOrchestrator,
    name: &str,
    color: bool,
    exporter: Option<&JsonExporter>,
) -> Result<()> {
    let mut progress = progress(&format!("Analyzing reviews of {}", name), color);
    let outcome = orchestrator
        .business_sentiment_summary(name)
        .await
        .context("Business sentiment summary failed")?;
    let stats = progress.finish(usize::from(outcome.is_ready()));
    info!("Finished: {}", stats.summary_line());

    match outcome {
        Outcome::Ready(summary) => {
            print_business_summary(&summary);
            export(exporter, "business_summary", &summary)
        }
        Outcome::NotFound(message) | Outcome::Empty(message) => {
            println!("{}", format_warning(&message));
            Ok(())
        }
    }
}

fn export<T: Serialize>(exporter: Option<&JsonExporter>, kind: &str, value: &T) -> Result<()> {
    if let Some(exporter) = exporter {
        let path = exporter
            .export(kind, value, true)
            .context("Failed to export result")?;
        println!("{}", format_success(&format!("Exported to {}", path.display())));
    }
    Ok(())
}

fn print_search_results(results: &TextSearchResults) {
    if let Some(alternate) = &results.alternate_phrase {
        println!("{}", format_info(&format!("Also searched for \"{}\"", alternate)));
    }

    println!("{}", format_heading("Businesses"));
    if results.businesses.is_empty() {
        println!("{}", format_warning("No matching businesses"));
    }
    for (idx, business) in results.businesses.iter().enumerate() {
        let address = business.address.as_deref().unwrap_or("address unknown");
        println!(
            "{}",
            format_rank(
                idx + 1,
                &format!("{} ({}) score {:.3}", business.name, address, business.score)
            )
        );
    }

    if results.reviews.is_empty() {
        return;
    }

    println!("{}", format_heading("Reviews"));
    for (idx, found) in results.reviews.iter().enumerate() {
        let business = found.business_name.as_deref().unwrap_or("unknown business");
        println!(
            "{}",
            format_rank(idx + 1, &format!("{} score {:.3}", business, found.review.score))
        );
        println!(
            "    {}",
            Validator::truncate_text(&found.review.text, PREVIEW_CHARS)
        );
    }
}

fn print_geo_results(results: &GeoSearchResults) {
    println!(
        "{}",
        format_heading(&format!(
            "Businesses between ({}, {}) and ({}, {})",
            results.top_left.lat,
            results.top_left.lon,
            results.bottom_right.lat,
            results.bottom_right.lon
        ))
    );

    if results.businesses.is_empty() {
        println!("{}", format_warning("No businesses in this area"));
    }
    for (idx, business) in results.businesses.iter().enumerate() {
        let address = business.address.as_deref().unwrap_or("address unknown");
        println!(
            "{}",
            format_rank(idx + 1, &format!("{} ({})", business.name, address))
        );
    }
}

fn print_user_summary(summary: &UserSummary) {
    println!(
        "{}",
        format_heading(&format!("Reviews by {}", summary.user_id))
    );
    println!("Total reviews: {}", summary.review_count);
    if summary.review_count > summary.reviews_retrieved as u64 {
        println!(
            "{}",
            format_info(&format!(
                "Analyzed the {} most relevant reviews",
                summary.reviews_retrieved
            ))
        );
    }
    println!("Businesses reviewed: {}", summary.business_ids.len());

    println!("{}", format_heading("Bounding boxes"));
    for (idx, visited) in summary.bounding_boxes.iter().enumerate() {
        let (min_lon, min_lat, max_lon, max_lat) = visited.bounding_box.as_tuple();
        println!(
            "{}",
            format_rank(
                idx + 1,
                &format!(
                    "{}: lon [{:.4}, {:.4}] lat [{:.4}, {:.4}]",
                    visited.name, min_lon, max_lon, min_lat, max_lat
                )
            )
        );
    }

    println!("{}", format_heading("Top words"));
    for (idx, entry) in summary.top_words.iter().enumerate() {
        println!(
            "{}",
            format_rank(idx + 1, &format!("{} ({})", entry.ngram, entry.count))
        );
    }

    println!("{}", format_heading("Top phrases"));
    for (idx, entry) in summary.top_phrases.iter().enumerate() {
        println!(
            "{}",
            format_rank(idx + 1, &format!("{} ({})", entry.ngram, entry.count))
        );
    }

    println!("{}", format_heading("Representative sentences"));
    for (idx, sentence) in summary.representative_sentences.iter().enumerate() {
        println!("{}", format_rank(idx + 1, sentence));
    }
}

fn print_business_summary(summary: &BusinessSentimentSummary) {
    println!(
        "{}",
        format_heading(&format!(
            "{} ({})",
            summary.business_name, summary.business_id
        ))
    );
    if summary.other_matches > 0 {
        println!(
            "{}",
            format_warning(&format!(
                "{} other businesses matched this name",
                summary.other_matches
            ))
        );
    }

    println!(
        "Reviews analyzed: {} ({} positive, {} negative)",
        summary.reviews_analyzed, summary.positive_count, summary.negative_count
    );
    println!(
        "{}",
        format_success(&format!("The majority of reviews are {}", summary.majority))
    );

    println!("{}", format_heading("Most frequent words"));
    for (idx, entry) in summary.word_frequencies.iter().take(20).enumerate() {
        println!(
            "{}",
            format_rank(idx + 1, &format!("{} ({})", entry.ngram, entry.count))
        );
    }

    println!("{}", format_heading("Most positive reviews"));
    for (idx, review) in summary.top_positive.iter().enumerate() {
        println!(
            "{}",
            format_rank(
                idx + 1,
                &format!(
                    "[{:.3}] {}",
                    review.score,
                    Validator::truncate_text(&review.text, PREVIEW_CHARS)
                )
            )
        );
    }

    println!("{}", format_heading("Most negative reviews"));
    for (idx, review) in summary.top_negative.iter().enumerate() {
        println!(
            "{}",
            format_rank(
                idx + 1,
                &format!(
                    "[{:.3}] {}",
                    review.score,
                    Validator::truncate_text(&review.text, PREVIEW_CHARS)
                )
            )
        );
    }
}
