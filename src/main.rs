use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use mentor_match::cli::{Cli, Outcome};
use mentor_match::config::AppConfig;
use mentor_match::error::{Error, Result};
use mentor_match::generation::MentorGenerator;
use mentor_match::llm::create_provider;
use mentor_match::wizard::WizardManager;

#[tokio::main]
async fn main() {
    // Install rustls crypto provider before any TLS usage; a second install is a no-op.
    let _ = rustls::crypto::ring::default_provider().install_default();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        if matches!(e, Error::Config(_)) {
            eprintln!("  export GEMINI_API_KEY=...");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;

    eprintln!("Mentorfy v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Mentors per search: {}", config.generator.mentor_count);
    eprintln!("   Type 'help' for commands, 'quit' to exit.\n");

    let llm = create_provider(&config.llm)?;
    let generator = Arc::new(MentorGenerator::new(llm, config.generator.clone()));
    let mut cli = Cli::new(WizardManager::new(generator));

    println!("{}", cli.screen().await);
    eprint!("> ");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            eprint!("> ");
            continue;
        }
        match cli.handle_line(&line).await {
            Outcome::Continue(text) => println!("\n{text}"),
            Outcome::Quit => break,
        }
        eprint!("> ");
    }

    Ok(())
}
