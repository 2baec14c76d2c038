use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use falafluente::catalog::{Level, Skill, find_topic, topics_for};
use falafluente::content::{
    API_KEY_ENV, ApiKeyManager, ClaudeClient, ClaudeModel, ContentGenerator, GenerationRequest,
};
use falafluente::{App, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "falafluente")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one exercise set and print it as JSON
    Generate {
        /// CEFR level: A1, A2, B1, B1+, B2 or C1
        #[arg(short, long)]
        level: Level,
        /// grammar, vocabulary, reading or use-of-english
        #[arg(short, long)]
        skill: Skill,
        /// Topic id, see `falafluente topics`
        #[arg(short, long)]
        topic: String,
        /// Override the configured model (haiku, sonnet4, sonnet, opus)
        #[arg(short, long)]
        model: Option<ClaudeModel>,
    },
    /// List topics, optionally for one skill
    Topics {
        #[arg(short, long)]
        skill: Option<Skill>,
    },
    /// Manage the Anthropic API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store a key in the system keyring
    Set { key: String },
    /// Remove the stored key
    Clear,
    /// Show whether a key is configured
    Status,
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "falafluente=info".into())
}

/// The TUI owns the terminal, so it logs to a file instead
fn init_file_logging() -> Result<()> {
    let path = Config::log_path()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {:?}", dir))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate { level, skill, topic, model }) => {
            init_stderr_logging();
            generate(level, skill, &topic, model).await?;
        }
        Some(Commands::Topics { skill }) => {
            let skills = match skill {
                Some(skill) => vec![skill],
                None => Skill::offered().to_vec(),
            };
            let levels: Vec<_> = Level::all().iter().map(|l| l.label()).collect();
            println!("Levels: {}\n", levels.join(", "));
            for skill in skills {
                println!("{} ({})", skill.name(), skill.label());
                for topic in topics_for(skill) {
                    println!("  {:<16} {} - {}", topic.id, topic.name, topic.description);
                }
            }
        }
        Some(Commands::Key { action }) => {
            init_stderr_logging();
            match action {
                KeyAction::Set { key } => {
                    ApiKeyManager::set_api_key(&key)?;
                    println!("API key saved: {}", ApiKeyManager::mask_key(key.trim()));
                }
                KeyAction::Clear => {
                    ApiKeyManager::delete_api_key()?;
                    println!("API key removed");
                }
                KeyAction::Status => match ApiKeyManager::get_api_key() {
                    Ok(key) => {
                        let source =
                            if std::env::var(API_KEY_ENV).is_ok() { API_KEY_ENV } else { "keyring" };
                        let masked = ApiKeyManager::mask_key(&key);
                        println!("API key configured ({}): {}", source, masked);
                    }
                    Err(e) => println!("No API key configured: {}", e),
                },
            }
        }
        None => {
            // Launch TUI
            init_file_logging()?;
            let config = Config::load()?;
            let mut app = App::new(config)?;
            app.run().await?;
        }
    }

    Ok(())
}

async fn generate(
    level: Level,
    skill: Skill,
    topic_id: &str,
    model: Option<ClaudeModel>,
) -> Result<()> {
    if !Skill::offered().contains(&skill) {
        bail!("{} is not offered", skill);
    }
    let Some(topic) = find_topic(topic_id).filter(|t| topics_for(skill).contains(t)) else {
        let ids: Vec<_> = topics_for(skill).iter().map(|t| t.id).collect();
        bail!("Unknown topic '{}' for {}. Options: {}", topic_id, skill, ids.join(", "));
    };

    let config = Config::load()?;
    let key = ApiKeyManager::get_api_key().with_context(|| {
        format!("Set {} or run `falafluente key set <api-key>`", API_KEY_ENV)
    })?;
    let client = ClaudeClient::new(key, model.unwrap_or(config.model))?;

    let request = GenerationRequest::new(level, skill, topic.name);
    let exercise = client.generate(&request).await?;
    println!("{}", serde_json::to_string_pretty(&exercise)?);
    Ok(())
}
