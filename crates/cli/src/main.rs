use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Catalog, CatalogRepository, FileRepository, MovieRecord, UserId};
use pipeline::{ExclusionPolicy, RankingConfig, RecommendationItem};
use server::api::{AppState, create_router};
use server::{Config, RecommendationOrchestrator};
use similarity::{DEFAULT_NEIGHBORS, NeighborQuery};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::debug;

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Movie recommendation engine using content similarity", long_about = None)]
struct Cli {
    /// Directory holding movies.dat (or movies.json) and engagements.dat
    #[arg(short, long, default_value = "data/sample")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Candidates need more votes than this
        #[arg(long, default_value = "1000")]
        min_votes: u32,

        /// Which engaged movies to exclude: query_row or profile
        #[arg(long, default_value = "query_row")]
        exclusion: ExclusionPolicy,

        /// Show catalog details for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Find the movies most similar to one movie
    Similar {
        /// Movie ID of the reference movie
        #[arg(long, conflicts_with = "title")]
        id: Option<u32>,

        /// Exact title of the reference movie (case-insensitive)
        #[arg(long)]
        title: Option<String>,

        /// Number of neighbors, the reference movie included
        #[arg(long, default_value_t = DEFAULT_NEIGHBORS)]
        neighbors: usize,
    },

    /// Show a user's engagement history
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Serve the HTTP API over the data directory
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let repository = Arc::new(
        FileRepository::open(&cli.data_dir)
            .with_context(|| format!("Failed to open data directory {}", cli.data_dir.display()))?,
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            limit,
            min_votes,
            exclusion,
            explain,
        } => {
            let config = RankingConfig::default()
                .with_top_n(limit)
                .with_min_vote_count(min_votes)
                .with_exclusion(exclusion);
            handle_recommend(repository, user_id, config, explain).await?
        }
        Commands::Similar {
            id,
            title,
            neighbors,
        } => handle_similar(repository, id, title, neighbors).await?,
        Commands::User { user_id } => handle_user(repository, user_id)?,
        Commands::Search { title } => handle_search(repository, title)?,
        Commands::Serve { host, port } => handle_serve(repository, host, port).await?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(repository, requests, concurrent).await?,
    }

    Ok(())
}

/// Build the engine, reporting how long it took
async fn load_orchestrator(
    repository: Arc<FileRepository>,
    neighbors: usize,
) -> Result<RecommendationOrchestrator> {
    println!(
        "Building engine from {}...",
        repository.data_dir().display()
    );
    let start = Instant::now();
    let orchestrator = RecommendationOrchestrator::new(repository, neighbors)
        .await
        .context("Failed to build recommendation engine")?;
    println!(
        "{} Indexed {} movies in {:?}",
        "✓".green(),
        orchestrator.movie_count().await,
        start.elapsed()
    );
    Ok(orchestrator)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    repository: Arc<FileRepository>,
    user_id: UserId,
    config: RankingConfig,
    explain: bool,
) -> Result<()> {
    let catalog = load_catalog(repository.as_ref())?;
    let orchestrator = load_orchestrator(repository, DEFAULT_NEIGHBORS).await?;

    let recommendations = orchestrator.recommend_for_user(&user_id, &config).await?;

    print_recommendations(
        &format!("Recommendations for user {}:", user_id),
        &recommendations,
        explain.then_some(&catalog),
    );
    Ok(())
}

/// Handle the 'similar' command
async fn handle_similar(
    repository: Arc<FileRepository>,
    id: Option<u32>,
    title: Option<String>,
    neighbors: usize,
) -> Result<()> {
    let query = match (id, title) {
        (Some(id), _) => NeighborQuery::Id(id),
        (None, Some(title)) => NeighborQuery::Title(title),
        (None, None) => bail!("Pass either --id or --title"),
    };

    let orchestrator = load_orchestrator(repository, neighbors).await?;
    let recommendations = orchestrator.recommend_similar_to(query.clone()).await?;

    print_recommendations(
        &format!("Movies similar to {}:", query),
        &recommendations,
        None,
    );
    Ok(())
}

/// Handle the 'user' command
fn handle_user(repository: Arc<FileRepository>, user_id: UserId) -> Result<()> {
    let catalog = load_catalog(repository.as_ref())?;
    let history = repository.fetch_user_engaged_ids(&user_id)?;
    if history.is_empty() {
        return Err(anyhow!("User {} has no engagement history", user_id));
    }

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Engaged movies: {}", "• ".green(), history.len());

    let rated: Vec<f32> = history.iter().filter_map(|engaged| engaged.rating).collect();
    if !rated.is_empty() {
        let avg = rated.iter().sum::<f32>() / rated.len() as f32;
        println!("{}Average rating: {:.2} ({} rated)", "• ".cyan(), avg, rated.len());
    }

    println!("History (profile order):");
    for engaged in &history {
        let rating = engaged
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        match catalog.get_movie(engaged.movie_id) {
            Some(movie) => println!(
                "  - {}: {} [{}] (Rating: {})",
                movie.id,
                movie.title,
                movie.genres.join(", "),
                rating
            ),
            None => println!(
                "  - {}: {}",
                engaged.movie_id,
                "not in catalog".yellow()
            ),
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(repository: Arc<FileRepository>, title: String) -> Result<()> {
    let catalog = load_catalog(repository.as_ref())?;
    let title_lower = title.to_lowercase();

    // (relevance, movie): 0 = exact match, 1 = substring match
    let mut matches: Vec<(u8, &MovieRecord)> = catalog
        .iter()
        .filter_map(|movie| {
            let movie_title_lower = movie.title.to_lowercase();
            if movie_title_lower == title_lower {
                Some((0, movie))
            } else if movie_title_lower.contains(&title_lower) {
                Some((1, movie))
            } else {
                None
            }
        })
        .collect();

    // Sort by relevance (exact match first, then by rating)
    matches.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.rating.total_cmp(&a.1.rating)));

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  {}", "no matches".yellow());
    }
    for (_, movie) in matches.iter().take(20) {
        println!(
            "{}: {} [{}] rating {:.1} ({} votes)",
            movie.id,
            movie.title,
            movie.genres.join(", "),
            movie.rating,
            movie.vote_count
        );
    }
    Ok(())
}

/// Handle the 'serve' command
async fn handle_serve(repository: Arc<FileRepository>, host: String, port: u16) -> Result<()> {
    let config = Config {
        host,
        port,
        data_dir: repository.data_dir().to_path_buf(),
        ..Config::default()
    };
    let orchestrator = load_orchestrator(repository, config.neighbor_count).await?;
    let app = create_router(AppState::new(orchestrator, config.ranking()));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    println!("{} Listening on http://{}", "✓".green(), address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    repository: Arc<FileRepository>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let users = repository.user_ids()?;
    if users.is_empty() {
        bail!("No users with engagement history in {}", repository.data_dir().display());
    }

    let orchestrator = load_orchestrator(repository, DEFAULT_NEIGHBORS).await?;
    let config = RankingConfig::default();

    // Pick random users with history
    let user_ids: Vec<UserId> = (0..requests)
        .map(|_| users[rand::random::<u32>() as usize % users.len()].clone())
        .collect();

    // Use tokio::spawn to make concurrent requests, at most `concurrent` in flight
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();
    let mut handles = vec![];
    for user in user_ids {
        let orchestrator = orchestrator.clone();
        let permits = permits.clone();
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            let outcome = orchestrator.recommend_for_user(&user, &config).await;
            if let Err(err) = &outcome {
                debug!("Request for {} failed: {}", user, err);
            }
            Ok::<_, anyhow::Error>((start.elapsed(), outcome.is_ok()))
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = vec![];
    let mut failures = 0;
    for handle in handles {
        let (elapsed, ok) = handle.await??;
        timings.push(elapsed);
        if !ok {
            failures += 1;
        }
    }
    let wall_time = wall_clock.elapsed();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} failed)", requests, failures);
    println!("Wall-clock time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Read and validate the catalog for display lookups
fn load_catalog(repository: &dyn CatalogRepository) -> Result<Catalog> {
    let records = repository
        .fetch_all_movies()
        .context("Failed to read movie catalog")?;
    Ok(Catalog::from_records(records)?)
}

/// Helper function to format and print recommendations
fn print_recommendations(
    header: &str,
    recommendations: &[RecommendationItem],
    details: Option<&Catalog>,
) {
    println!("{}", header.bold().blue());
    if recommendations.is_empty() {
        println!("  {}", "nothing passed the filters".yellow());
    }
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - Similarity: {:.3}",
            (i + 1).to_string().green(),
            rec.title,
            rec.similarity
        );
        if let Some(movie) = details.and_then(|catalog| catalog.get_movie(rec.movie_id)) {
            println!(
                "   id {} [{}] rating {:.1} ({} votes)",
                movie.id,
                movie.genres.join(", "),
                movie.rating,
                movie.vote_count
            );
        }
    }
}
