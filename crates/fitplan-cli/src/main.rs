mod chat_cmd;
mod config;
mod options_cmd;
mod plan_cmds;
mod serve_cmd;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use fitplan_core::chat::OpenAiChatClient;
use fitplan_core::session::SessionStore;
use fitplan_db::config::DbConfig;
use fitplan_db::pool;

use config::FitplanConfig;

#[derive(Parser)]
#[command(name = "fitplan", about = "12-week workout plan generator with a chat proxy")]
struct Cli {
    /// Database URL (overrides FITPLAN_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fitplan config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// OpenAI-compatible API base URL
        #[arg(long)]
        ai_base_url: Option<String>,
        /// Chat model name
        #[arg(long)]
        ai_model: Option<String>,
        /// API key for the chat API
        #[arg(long)]
        ai_api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the fitplan database (requires config file or env vars)
    DbInit,
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 2402)]
        port: u16,
    },
    /// Generate a 12-week plan
    Generate(GenerateArgs),
    /// Show the current week of the saved plan
    Dashboard,
    /// Show one workout of the saved plan
    Workout {
        /// Week number (1-12)
        week: u32,
        /// Training day within the week (1-based)
        day: u32,
    },
    /// List goals, focus options, equipment and experience levels
    Options,
    /// Ask the chat model a question and record the exchange
    Chat {
        /// The question to send
        query: String,
    },
    /// List recently recorded chats
    History {
        /// Maximum number of chats to show
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// lose-weight, get-stronger, get-athletic or build-muscle
    #[arg(long)]
    pub goal: String,
    /// Optional refinement, e.g. glutes or powerlifting
    #[arg(long)]
    pub focus: Option<String>,
    /// none, minimal, home-gym or full-gym
    #[arg(long)]
    pub equipment: String,
    /// beginner, intermediate or advanced
    #[arg(long)]
    pub experience: String,
    /// Training days per week (2-6)
    #[arg(long)]
    pub days: i64,
    /// Minutes per workout (20-90)
    #[arg(long)]
    pub minutes: i64,
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
    /// Save the plan as the current session
    #[arg(long)]
    pub save: bool,
}

/// Execute the `fitplan init` command: write config file.
fn cmd_init(
    db_url: &str,
    ai_base_url: Option<String>,
    ai_model: Option<String>,
    ai_api_key: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let path = fitplan_core::paths::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let has_key = ai_api_key.is_some();
    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: Some(db_url.to_owned()),
        },
        ai: config::AiSection {
            base_url: ai_base_url,
            api_key: ai_api_key,
            model: ai_model,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    if let Some(url) = &cfg.ai.base_url {
        println!("  ai.base_url = {url}");
    }
    if let Some(model) = &cfg.ai.model {
        println!("  ai.model = {model}");
    }
    if has_key {
        println!("  ai.api_key = (set)");
    }
    println!();
    println!("Next: run `fitplan db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `fitplan db-init` command: create database and run migrations.
async fn cmd_db_init(resolved: &FitplanConfig) -> anyhow::Result<()> {
    println!("Initializing fitplan database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("fitplan db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let sessions = SessionStore::default();

    match cli.command {
        Commands::Init {
            db_url,
            ai_base_url,
            ai_model,
            ai_api_key,
            force,
        } => {
            cmd_init(&db_url, ai_base_url, ai_model, ai_api_key, force)?;
        }
        Commands::DbInit => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref());
            cmd_db_init(&resolved).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref());
            // Lazy so plan routes work while the store is down.
            let db_pool = pool::create_lazy_pool(&resolved.db_config)?;
            let completer = OpenAiChatClient::new(resolved.chat_config)?;
            let state = serve_cmd::AppState {
                pool: db_pool.clone(),
                completer: Arc::new(completer),
            };
            let result = serve_cmd::run_serve(state, &bind, port).await;
            db_pool.close().await;
            result?;
        }
        Commands::Generate(args) => {
            plan_cmds::run_generate(args, &sessions)?;
        }
        Commands::Dashboard => {
            plan_cmds::run_dashboard(&sessions)?;
        }
        Commands::Workout { week, day } => {
            plan_cmds::run_workout(&sessions, week, day)?;
        }
        Commands::Options => {
            options_cmd::run_options();
        }
        Commands::Chat { query } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref());
            let completer = OpenAiChatClient::new(resolved.chat_config)?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = chat_cmd::run_chat(&db_pool, &completer, &query).await;
            db_pool.close().await;
            result?;
        }
        Commands::History { limit } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref());
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = chat_cmd::run_history(&db_pool, limit).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
