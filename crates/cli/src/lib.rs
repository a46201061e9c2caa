use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use config::PantryConfig;
use pantry_normalizer::TextNormalizer;
use pantry_protocol::{serialize_json, ErrorEnvelope, RecommendRequest};
use pantry_recommend::{RecommendError, RecommendationService, ServiceHandle};
use pantry_vector_index::{Corpus, FitParams, IndexBundle};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod access;
mod config;
mod http_api;

const SUMMARY_BIGRAMS: usize = 20;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    print_stdout(&serialize_json(value)?)
}

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Recipe recommendations from the ingredients you have", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (TOML); defaults to $PANTRY_CONFIG when set
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index bundle from a scraped recipe CSV
    Build(BuildArgs),

    /// Recommend recipes for a comma-separated ingredient list
    Recommend(RecommendArgs),

    /// Recipes most similar to one corpus entry
    Similar(SimilarArgs),

    /// Most frequent ingredient tokens across the corpus
    #[command(name = "top-ingredients")]
    TopIngredients(TopIngredientsArgs),

    /// Serve the recommendation API over HTTP
    #[command(name = "serve-http")]
    ServeHttp(ServeArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Recipe CSV (title, ingredients, calories, serves, total time, image)
    #[arg(long)]
    input: PathBuf,

    /// Where to write the index bundle
    #[arg(long)]
    output: PathBuf,

    /// Minimum document frequency (overrides [fit] min_df)
    #[arg(long)]
    min_df: Option<usize>,

    /// Maximum document frequency as a fraction (overrides [fit] max_df)
    #[arg(long)]
    max_df: Option<f64>,
}

#[derive(Args)]
struct RecommendArgs {
    /// Index bundle produced by `pantry build`
    #[arg(long)]
    index: PathBuf,

    /// Ingredients on hand, comma-separated
    #[arg(long)]
    ingredients: String,

    /// Calorie ceiling per serving (inclusive)
    #[arg(long)]
    max_calories: Option<f64>,

    /// Number of results (defaults to [query] default_top_k)
    #[arg(long)]
    top_k: Option<usize>,
}

#[derive(Args)]
struct SimilarArgs {
    #[arg(long)]
    index: PathBuf,

    /// Corpus position of the recipe to compare against
    #[arg(long)]
    recipe: usize,

    #[arg(long, default_value_t = 5)]
    top_k: usize,
}

#[derive(Args)]
struct TopIngredientsArgs {
    #[arg(long)]
    index: PathBuf,

    #[arg(long, default_value_t = 10)]
    top_n: usize,
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long)]
    index: PathBuf,

    /// Bind address (overrides [server] bind), e.g. 127.0.0.1:7700
    #[arg(long)]
    bind: Option<String>,

    /// Allow binding to non-loopback addresses (same as [server] public; requires an admin token)
    #[arg(long)]
    public: bool,

    /// Require Authorization: Bearer <token> on /reload (env: PANTRY_ADMIN_TOKEN)
    #[arg(long)]
    admin_token: Option<String>,
}

#[derive(Serialize)]
struct BuildSummary {
    output: String,
    recipes: usize,
    vocabulary_size: usize,
    stored_weights: usize,
    bigram_sample: Vec<String>,
    build_id: String,
    checksum: String,
}

#[derive(Serialize)]
struct SimilarCard {
    index: usize,
    title: String,
    similarity: f64,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = PantryConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build(args) => run_build(args, &config)?,
        Commands::Recommend(args) => run_recommend(args, &config)?,
        Commands::Similar(args) => run_similar(args, &config)?,
        Commands::TopIngredients(args) => run_top_ingredients(args, &config)?,
        Commands::ServeHttp(args) => serve_http(args, config).await?,
    }

    Ok(())
}

/// Load a bundle and wrap it in a service configured like the build.
pub(crate) fn load_service(
    index: &Path,
    config: &PantryConfig,
) -> pantry_recommend::Result<RecommendationService> {
    let bundle = IndexBundle::load(index)?;
    let normalizer = TextNormalizer::new(&config.normalizer)?;
    RecommendationService::with_normalizer(bundle, normalizer).with_query_config(config.query)
}

fn open_service(index: &Path, config: &PantryConfig) -> Result<RecommendationService> {
    load_service(index, config)
        .with_context(|| format!("Failed to load index bundle {}", index.display()))
}

fn run_build(args: BuildArgs, config: &PantryConfig) -> Result<()> {
    let params = FitParams {
        min_df: args.min_df.unwrap_or(config.fit.min_df),
        max_df: args.max_df.unwrap_or(config.fit.max_df),
        ..config.fit
    };

    let normalizer = TextNormalizer::new(&config.normalizer)?;
    let corpus = Corpus::read_csv(&args.input, &normalizer)
        .with_context(|| format!("Failed to read corpus {}", args.input.display()))?;
    let bundle = IndexBundle::build(corpus, params)?;
    bundle
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    print_json(&BuildSummary {
        output: args.output.display().to_string(),
        recipes: bundle.corpus().len(),
        vocabulary_size: bundle.vocabulary().len(),
        stored_weights: bundle.matrix().nnz(),
        bigram_sample: bundle
            .vocabulary()
            .bigrams()
            .take(SUMMARY_BIGRAMS)
            .map(str::to_string)
            .collect(),
        build_id: bundle.build_id().to_string(),
        checksum: bundle.checksum().to_string(),
    })
}

fn run_recommend(args: RecommendArgs, config: &PantryConfig) -> Result<()> {
    let service = open_service(&args.index, config)?;
    let request = RecommendRequest {
        max_calories: args.max_calories,
        top_k: args.top_k,
        ..RecommendRequest::from_comma_list(&args.ingredients)
    };

    match service.recommend(&request) {
        Ok(response) => print_json(&response),
        Err(err) => fail_with_envelope(err),
    }
}

fn run_similar(args: SimilarArgs, config: &PantryConfig) -> Result<()> {
    let service = open_service(&args.index, config)?;
    match service.similar_recipes(args.recipe, args.top_k) {
        Ok(hits) => {
            let cards: Vec<SimilarCard> = hits
                .iter()
                .map(|hit| SimilarCard {
                    index: hit.index,
                    title: hit.recipe.title.clone(),
                    similarity: hit.similarity,
                })
                .collect();
            print_json(&cards)
        }
        Err(err) => fail_with_envelope(err),
    }
}

fn run_top_ingredients(args: TopIngredientsArgs, config: &PantryConfig) -> Result<()> {
    let service = open_service(&args.index, config)?;
    print_json(&service.most_used_ingredients(args.top_n))
}

/// Caller errors are reported as a JSON envelope on stdout with exit code 1.
fn fail_with_envelope(err: RecommendError) -> Result<()> {
    if !err.is_client_error() {
        return Err(server_fault(err));
    }
    print_json(&ErrorEnvelope::new(err.code(), err.to_string()))?;
    std::process::exit(1);
}

fn server_fault(err: RecommendError) -> anyhow::Error {
    anyhow::Error::new(err).context("Query failed")
}

async fn serve_http(args: ServeArgs, config: PantryConfig) -> Result<()> {
    let admin_token = args
        .admin_token
        .clone()
        .or_else(|| std::env::var(access::ADMIN_TOKEN_ENV).ok());
    let plan = access::ServePlan::resolve(
        &config.server,
        args.bind.as_deref(),
        args.public,
        admin_token.as_deref(),
    )
    .await?;

    let service = open_service(&args.index, &config)?;
    let state = Arc::new(http_api::HttpState {
        handle: ServiceHandle::new(service),
        index_path: args.index,
        config,
        reload_key: plan.reload_key,
    });
    let app = http_api::router(state);

    let listener = tokio::net::TcpListener::bind(plan.addrs.as_slice())
        .await
        .with_context(|| format!("Failed to bind {}", plan.bind))?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");

    print_stdout(&format!("Serving recommendations: {base_url}/recommend"))?;
    print_stdout(&format!("Health endpoint: {base_url}/health"))?;
    print_stdout(&format!(
        "Try: curl -X POST {base_url}/recommend -H 'Content-Type: application/json' -d '{{\"ingredients\":[\"chicken\",\"rice\"]}}'"
    ))?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_vector_index::IndexError;

    #[test]
    fn server_faults_keep_their_source_chain() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "bundle unreadable");
        let err = server_fault(RecommendError::from(IndexError::from(io)));

        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        assert_eq!(chain[0], "Query failed");
        assert!(chain[1].starts_with("Index error"), "{chain:?}");
        assert!(chain.iter().any(|link| link == "bundle unreadable"), "{chain:?}");
        assert!(format!("{err:?}").contains("Caused by"));
    }
}
