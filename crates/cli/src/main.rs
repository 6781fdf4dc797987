use anyhow::{Context, Result, bail};
use catalog::{FlatFileStore, MovieFilter, MovieId};
use clap::{Parser, Subcommand};
use colored::Colorize;
use server::{RecommendationBundle, RecommendationOrchestrator};
use std::path::PathBuf;

/// CineMatch - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "cinematch")]
#[command(about = "Personal movie recommendations from your own star ratings", long_about = None)]
struct Cli {
    /// Path to the flat-file data directory
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User to generate recommendations for
        #[arg(long)]
        user_id: String,

        /// Emit the raw result bundle as JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Rate a movie 1-5 stars (overwrites any earlier rating)
    Rate {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        movie_id: MovieId,

        /// Star value, 1-5
        #[arg(long)]
        rating: u8,
    },

    /// Remove a rating
    Unrate {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        movie_id: MovieId,
    },

    /// List a user's ratings
    Ratings {
        #[arg(long)]
        user_id: String,
    },

    /// List catalog movies, optionally filtered
    Movies {
        /// Genre substring match (case-insensitive)
        #[arg(long)]
        genre: Option<String>,

        /// Exact release year
        #[arg(long)]
        year: Option<u16>,

        /// Title substring match (case-insensitive)
        #[arg(long)]
        search: Option<String>,
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
    let store = FlatFileStore::new(&cli.data_dir);

    match cli.command {
        Commands::Recommend { user_id, json } => handle_recommend(store, &user_id, json).await?,
        Commands::Rate {
            user_id,
            movie_id,
            rating,
        } => handle_rate(&store, &user_id, movie_id, rating)?,
        Commands::Unrate { user_id, movie_id } => handle_unrate(&store, &user_id, movie_id)?,
        Commands::Ratings { user_id } => handle_ratings(&store, &user_id)?,
        Commands::Movies {
            genre,
            year,
            search,
        } => handle_movies(&store, genre, year, search)?,
    }

    Ok(())
}

async fn handle_recommend(store: FlatFileStore, user_id: &str, json: bool) -> Result<()> {
    let orchestrator = RecommendationOrchestrator::for_store(store);

    let bundle = match orchestrator.recommend(user_id).await {
        Ok(bundle) => bundle,
        Err(err) => {
            if !err.is_user_correctable() {
                // Generic message for the user; the cause goes to the log.
                tracing::error!(error = ?err, "Recommendation pipeline failed");
            }
            bail!("{} (status {})", err, err.status_code());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    print_bundle(user_id, &bundle);
    Ok(())
}

fn print_bundle(user_id: &str, bundle: &RecommendationBundle) {
    println!(
        "\n{} (based on {} ratings)",
        format!("Recommendations for {user_id}").bold(),
        bundle.total_ratings
    );

    for (i, rec) in bundle.recommendations.iter().enumerate() {
        println!(
            "{}. {} ({})  {}",
            i + 1,
            rec.movie.title.cyan(),
            rec.movie.year,
            format!("score {:.2}", rec.final_score).green()
        );
        println!(
            "   genres: {}  |  affinity {:.0}, global rating {:.1}",
            rec.movie.genres.join(", "),
            rec.genre_affinity,
            rec.movie.global_rating
        );
    }

    let mut preferred = Vec::new();
    let mut rejected = Vec::new();
    for gs in &bundle.genre_classification {
        match gs.score.cmp(&0) {
            std::cmp::Ordering::Greater => preferred.push(format!("{} (+{})", gs.genre, gs.score)),
            std::cmp::Ordering::Less => rejected.push(format!("{} ({})", gs.genre, gs.score)),
            std::cmp::Ordering::Equal => {}
        }
    }
    println!("\n{}", "Your taste profile".bold());
    println!("  {} {}", "preferred:".green(), preferred.join(", "));
    println!("  {} {}", "rejected: ".red(), rejected.join(", "));
}

fn handle_rate(store: &FlatFileStore, user_id: &str, movie_id: MovieId, rating: u8) -> Result<()> {
    let saved = store.rate(user_id, movie_id, rating)?;
    let title = store
        .movie(movie_id)?
        .map(|m| m.title)
        .unwrap_or_else(|| format!("movie {movie_id}"));
    println!(
        "{} {} rated {} {} star{}",
        "✓".green(),
        user_id,
        title.cyan(),
        saved.rating,
        if saved.rating == 1 { "" } else { "s" }
    );
    Ok(())
}

fn handle_unrate(store: &FlatFileStore, user_id: &str, movie_id: MovieId) -> Result<()> {
    store.unrate(user_id, movie_id)?;
    println!("{} removed rating for movie {}", "✓".green(), movie_id);
    Ok(())
}

fn handle_ratings(store: &FlatFileStore, user_id: &str) -> Result<()> {
    let ratings = store.user_ratings(user_id)?;
    if ratings.is_empty() {
        println!("No ratings for {user_id}");
        return Ok(());
    }

    println!("{}", format!("Ratings by {user_id}").bold());
    for r in &ratings {
        let title = store
            .movie(r.movie_id)?
            .map(|m| m.title)
            .unwrap_or_else(|| format!("movie {} (not in catalog)", r.movie_id));
        println!("  {}  {}", format!("{}★", r.rating).yellow(), title);
    }
    println!("{} ratings total", ratings.len());
    Ok(())
}

fn handle_movies(
    store: &FlatFileStore,
    genre: Option<String>,
    year: Option<u16>,
    search: Option<String>,
) -> Result<()> {
    let filter = MovieFilter {
        genre,
        year,
        title: search,
    };
    let movies = store
        .movies(&filter)
        .context("Failed to read the movie catalog")?;

    for m in &movies {
        println!(
            "{:>4}  {} ({})  {}  [{}]",
            m.id,
            m.title.cyan(),
            m.year,
            format!("{:.1}", m.global_rating).green(),
            m.genres.join(", ")
        );
    }
    println!("{} movies", movies.len());
    Ok(())
}
