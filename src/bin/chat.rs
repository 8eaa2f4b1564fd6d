//! Terminal chat client for the document Q&A server
//!
//! Optionally uploads a document first, then drives an interactive
//! question/answer loop against the server's ask endpoint.

use clap::Parser;
use docqa::session::{ChatSession, HttpAskBackend, Notice, Notifier, Role, SessionUpdate};
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Chat with an uploaded document from the terminal.
#[derive(Parser)]
#[command(name = "docqa-chat", version)]
struct Cli {
    /// Base URL of the document Q&A server
    #[arg(long, default_value = "http://localhost:8000")]
    server: String,

    /// Upload this file and chat about it
    #[arg(long)]
    upload: Option<PathBuf>,

    /// Chat about an already-uploaded document id
    #[arg(long, conflicts_with = "upload")]
    document: Option<String>,
}

/// Prints notices to stderr so they never interleave with answers.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!(
            "[{}] {}: {}",
            notice.severity, notice.title, notice.description
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let document_id = match (&cli.upload, &cli.document) {
        (Some(path), _) => {
            let id = upload_document(&server, path).await?;
            println!("Uploaded {} as document {id}", path.display());
            Some(id)
        }
        (None, Some(id)) => Some(id.clone()),
        (None, None) => None,
    };

    let backend = HttpAskBackend::new(&server);
    let (session, handle) = ChatSession::new(backend, StderrNotifier);
    tokio::spawn(session.run());

    // Render assistant turns as they arrive.
    let mut updates = handle.subscribe();
    tokio::spawn(async move {
        while let Ok(update) = updates.recv().await {
            match update {
                SessionUpdate::TurnAppended(turn) if turn.role == Role::Assistant => {
                    println!("assistant> {}", turn.content);
                }
                SessionUpdate::TranscriptCleared => println!("(conversation cleared)"),
                _ => {}
            }
        }
    });

    if let Some(id) = document_id {
        handle.select_document(id)?;
    }

    println!("Ask a question, \"/doc <id>\" to switch documents, \"/quit\" to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed == "/quit" || trimmed == "/exit" {
            break;
        }
        if let Some(id) = trimmed.strip_prefix("/doc ") {
            handle.select_document(id.trim())?;
            continue;
        }
        handle.submit(line)?;
    }
    Ok(())
}

/// Push a file through the server's multipart upload endpoint and
/// return the assigned document id.
async fn upload_document(
    server: &str,
    path: &Path,
) -> Result<String, Box<dyn std::error::Error>> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or("upload path has no filename")?
        .to_string();
    let bytes = tokio::fs::read(path).await?;

    let form = Form::new().part("file", Part::bytes(bytes).file_name(filename));
    let response = reqwest::Client::new()
        .post(format!("{server}/api/upload"))
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("upload failed ({status}): {body}").into());
    }

    let body: serde_json::Value = response.json().await?;
    body["document_id"]
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| "upload response is missing document_id".into())
}
