//! xayn: command-line access to the personalization service.
//!
//! Credentials come from the environment (optionally a `.env` file):
//! `XAYN_API_KEY`, `XAYN_USER_ID`, `XAYN_BASE_URL`, `XAYN_TIMEOUT_SECS`.
//! `--user-id` and `--base-url` take precedence over their variables.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xayn_core::config::{ENV_BASE_URL, ENV_USER_ID};
use xayn_core::{ClientConfig, ConfigError, IngestedDocument, PropertyValue, XaynClient};

const DEFAULT_DOCUMENT_ID: &str = "document id 0001";
const DEFAULT_SNIPPET: &str = "Snippet of text that will be used to calculate embeddings.";

#[derive(Parser)]
#[command(name = "xayn")]
#[command(author, version, about = "Client for the Xayn personalization service")]
#[command(propagate_version = true)]
struct Cli {
    /// User on whose behalf requests are made
    #[arg(short, long, global = true)]
    user_id: Option<String>,

    /// Service root URL
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the personalized document list for the user
    Personalization {
        /// Maximum number of documents to return
        #[arg(short, long)]
        count: Option<u32>,
    },

    /// Register a positive interaction ("like") with a document
    Interactions {
        /// Document to like
        #[arg(short, long, default_value = DEFAULT_DOCUMENT_ID)]
        document_id: String,
    },

    /// Ingest a single document
    Documents {
        /// Document id (default: a random UUID)
        #[arg(long)]
        id: Option<String>,

        /// Text used to compute the document embedding
        #[arg(short, long, default_value = DEFAULT_SNIPPET)]
        snippet: String,

        /// Document property as key=value (can specify multiple)
        #[arg(short, long, value_parser = parse_property)]
        property: Vec<(String, PropertyValue)>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.user_id.as_deref(), cli.base_url.as_deref())?;
    debug!(user_id = %config.user_id, base_url = %config.base_url, "loaded configuration");
    let client = XaynClient::new(config)?;

    match cli.command {
        Commands::Personalization { count } => cmd_personalization(&client, count).await?,
        Commands::Interactions { document_id } => cmd_interactions(&client, &document_id).await?,
        Commands::Documents {
            id,
            snippet,
            property,
        } => cmd_documents(&client, id, snippet, property).await?,
    }

    Ok(())
}

/// Resolve configuration from flags, then the environment and `.env`.
fn load_config(user_id: Option<&str>, base_url: Option<&str>) -> Result<ClientConfig, ConfigError> {
    dotenvy::dotenv().ok();
    ClientConfig::from_lookup(|name| {
        let flag = match name {
            ENV_USER_ID => user_id,
            ENV_BASE_URL => base_url,
            _ => None,
        };
        flag.map(str::to_string)
            .or_else(|| std::env::var(name).ok())
    })
}

async fn cmd_personalization(
    client: &XaynClient,
    count: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Calling /users/{}/personalized_documents ...", client.user_id());
    let list = client.fetch_personalized_documents(count).await?;

    if list.documents.is_empty() {
        println!("No documents.");
    }
    for doc in &list.documents {
        println!(
            "{:>4}  {}  {}",
            doc.score,
            doc.id,
            serde_json::to_string(&doc.properties)?
        );
    }
    Ok(())
}

async fn cmd_interactions(
    client: &XaynClient,
    document_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Calling /users/{}/interactions ...", client.user_id());
    client.like_document(document_id).await?;
    println!("Liked {document_id}");
    Ok(())
}

async fn cmd_documents(
    client: &XaynClient,
    id: Option<String>,
    snippet: String,
    properties: Vec<(String, PropertyValue)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let mut doc = IngestedDocument::new(id, snippet);
    doc.properties.extend(properties);

    println!("Calling /documents ...");
    client.add_documents(std::slice::from_ref(&doc)).await?;
    println!("Ingested {}", doc.id);
    Ok(())
}

/// Parse `key=value`, inferring the value type.
fn parse_property(raw: &str) -> Result<(String, PropertyValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty property key in `{raw}`"));
    }
    Ok((key.to_string(), infer_value(value)))
}

fn infer_value(raw: &str) -> PropertyValue {
    match raw {
        "true" => return PropertyValue::Bool(true),
        "false" => return PropertyValue::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return PropertyValue::Int(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => PropertyValue::Float(f),
        _ => PropertyValue::String(raw.to_string()),
    }
}
