//! concierge - terminal client for the multi-agent assistant

mod commands;
mod config;
mod render;

use anyhow::Context;
use clap::Parser;
use concierge_api::{ChatClient, FileUpload, QuickAction};
use concierge_session::{DispatchOutcome, Rejection, Session};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// concierge - chat with the HR, IT, travel and document agents
#[derive(Parser, Debug)]
#[command(name = "concierge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend API root (default: http://localhost:8001/api)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (default: 60)
    #[arg(long)]
    timeout: Option<u64>,

    /// Run in non-interactive mode with a single message
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Upload a document in non-interactive mode
    #[arg(short, long)]
    upload: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("concierge=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // CLI args take precedence over the config file
    let cfg = config::Config::load().with_overrides(args.base_url, args.timeout);
    let client = Arc::new(ChatClient::new(cfg.client_config()).context("Invalid configuration")?);
    tracing::debug!(base_url = client.base_url(), "Client ready");

    let session = Session::new(client.clone());

    // Non-interactive modes
    if let Some(path) = args.upload {
        return run_upload(&session, &path).await;
    }
    if let Some(command) = args.command {
        return run_command(&session, &command).await;
    }

    run_interactive(&session, &client).await
}

async fn run_command(session: &Session, command: &str) -> anyhow::Result<()> {
    println!("concierge> {}", command);
    println!();

    let mut events = session.subscribe();
    let outcome = session.send_message(command).await;
    render::drain(&mut events, false);
    exit_status(outcome)
}

async fn run_upload(session: &Session, path: &Path) -> anyhow::Result<()> {
    let file = FileUpload::from_path(path)
        .await
        .with_context(|| format!("Cannot upload {}", path.display()))?;

    let mut events = session.subscribe();
    let outcome = session.upload_file(&file).await;
    render::drain(&mut events, true);
    exit_status(outcome)
}

/// Map a one-shot dispatch to the process result
fn exit_status(outcome: DispatchOutcome) -> anyhow::Result<()> {
    match outcome {
        DispatchOutcome::Completed | DispatchOutcome::Discarded => Ok(()),
        // The apology has already been printed
        DispatchOutcome::Failed => std::process::exit(1),
        DispatchOutcome::Rejected(Rejection::EmptyMessage) => anyhow::bail!("Nothing to send"),
        DispatchOutcome::Rejected(Rejection::Busy) => {
            anyhow::bail!("Another request is still running")
        }
    }
}

async fn run_interactive(session: &Session, client: &ChatClient) -> anyhow::Result<()> {
    use std::io::{self, Write};

    let mut events = session.subscribe();
    let mut quick_actions: Vec<QuickAction> = Vec::new();

    // Show minimal startup info (only if TTY)
    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        eprintln!("concierge ({})", client.base_url());
        eprintln!("Type /help for commands.");
        eprintln!();
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let now = chrono::Utc::now();
        let command = session
            .with_state(|state| commands::execute_command(input, state, &quick_actions, now));

        let Some(result) = command else {
            println!();
            let outcome = session.send_message(input).await;
            render::drain(&mut events, false);
            report(outcome);
            continue;
        };

        match result {
            commands::CommandResult::Clear => {
                session.clear_chat();
                render::drain(&mut events, false);
                println!("Cleared conversation.");
            }
            commands::CommandResult::Exit => {
                break;
            }
            commands::CommandResult::Message(msg) => {
                println!("{}", msg);
            }
            commands::CommandResult::Unknown(cmd) => {
                println!("Unknown command: /{}", cmd);
                println!("Type /help for available commands.");
            }
            commands::CommandResult::Send(text) => {
                println!();
                let outcome = session.send_message(&text).await;
                render::drain(&mut events, true);
                report(outcome);
                continue;
            }
            commands::CommandResult::Upload(path) => match FileUpload::from_path(&path).await {
                Ok(file) => {
                    println!("Uploading {} ({} bytes)...\n", file.name(), file.len());
                    let outcome = session.upload_file(&file).await;
                    render::drain(&mut events, true);
                    report(outcome);
                    continue;
                }
                Err(e) => {
                    println!("Cannot upload {}: {}", path.display(), e);
                }
            },
            commands::CommandResult::FetchAgents => match client.agents().await {
                Ok(catalog) => println!("{}", commands::AgentsCommand::catalog_text(&catalog)),
                Err(e) => println!("Failed to load agents: {}", e),
            },
            commands::CommandResult::FetchQuickActions => match client.quick_actions().await {
                Ok(actions) => {
                    println!("{}", commands::ActionsCommand::list_text(&actions));
                    quick_actions = actions;
                }
                Err(e) => println!("Failed to load quick actions: {}", e),
            },
        }
        println!();
    }

    Ok(())
}

/// Tell the user about dispatches that produced no message
fn report(outcome: DispatchOutcome) {
    match outcome {
        DispatchOutcome::Rejected(Rejection::Busy) => {
            println!("Still waiting for the previous answer.\n");
        }
        DispatchOutcome::Rejected(Rejection::EmptyMessage) => {
            println!("Nothing to send.\n");
        }
        DispatchOutcome::Completed | DispatchOutcome::Failed | DispatchOutcome::Discarded => {}
    }
}
