use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use moral_tracks::{
    backend::GenerativeBackend,
    cli::{render_analysis, render_history, render_scenario, render_share, Commands},
    config::{Config, LogFormat},
    game::{Game, Phase},
    gemini::GeminiClient,
    model::{Difficulty, TrackId},
    storage::{HistoryStore, MemoryStore, SqliteStorage},
    DecisionAnalyzer, ScenarioGenerator,
};

/// Trolley-problem generator powered by Gemini
#[derive(Parser, Debug)]
#[command(name = "moral-tracks", version, about)]
struct Cli {
    /// Keep history in memory only
    #[arg(long, global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "Moral Tracks starting...");

    // Initialize storage
    let store: Arc<dyn HistoryStore> = if cli.no_persist {
        Arc::new(MemoryStore::new())
    } else {
        match SqliteStorage::new(&config.database).await {
            Ok(s) => {
                info!(path = %config.database.path.display(), "Database initialized");
                Arc::new(s)
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize database");
                return Err(e.into());
            }
        }
    };

    // Initialize Gemini client
    let backend: Arc<dyn GenerativeBackend> =
        match GeminiClient::new(&config.gemini, &config.request) {
            Ok(c) => {
                info!(model = %config.gemini.model, "Gemini client initialized");
                Arc::new(c)
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize Gemini client");
                return Err(e.into());
            }
        };

    let generator = ScenarioGenerator::from_config(backend.clone(), &config);
    let analyzer = DecisionAnalyzer::from_config(backend, &config);
    let mut game = Game::load(generator, analyzer, store).await?;

    let command = cli.command.unwrap_or(Commands::Play {
        difficulty: Difficulty::default(),
        rounds: 1,
    });
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    match command {
        Commands::Play { difficulty, rounds } => {
            game.select_difficulty(difficulty);
            play(&mut game, &mut input, rounds).await?;
        }
        Commands::Generate { difficulty } => {
            game.select_difficulty(difficulty);
            let state = game.start_game().await;
            match state.scenario() {
                Some(scenario) if state.phase() == Phase::Playing => {
                    println!("{}", serde_json::to_string_pretty(scenario)?);
                }
                _ => {
                    eprintln!("{}", state.error_message().unwrap_or("Generation failed"));
                    std::process::exit(1);
                }
            }
        }
        Commands::History { limit } => {
            print!("{}", render_history(game.history(), limit));
        }
        Commands::ClearHistory { yes } => {
            if game.history().is_empty() {
                println!("History is already empty.");
            } else if yes
                || confirm(
                    &mut input,
                    "Clear all decision history? This cannot be undone. [y/N]: ",
                )
                .await?
            {
                game.clear_history().await?;
                println!("History cleared.");
            }
        }
    }

    info!("Moral Tracks shutdown complete");
    Ok(())
}

/// Play `rounds` interactive rounds.
///
/// A failed request leaves the game on its error screen; the player can
/// retry the round or give up, which ends the command with an error.
async fn play(game: &mut Game, input: &mut InputLines, rounds: u32) -> anyhow::Result<()> {
    let rounds = rounds.max(1);
    let mut round = 1;

    while round <= rounds {
        info!(round, difficulty = %game.state().difficulty(), "Starting round");
        println!("\nLaying {} tracks...", game.state().difficulty());

        let state = game.start_game().await;
        if state.phase() != Phase::Playing {
            give_up_unless_retry(game, input).await?;
            continue;
        }
        if let Some(scenario) = state.scenario() {
            print!("{}", render_scenario(scenario, state.scenario_difficulty()));
        }

        let Some(choice) = read_choice(input).await? else {
            game.go_home();
            return Ok(());
        };

        println!("\nAnalyzing your soul...");
        if let Err(e) = game.decide(choice).await {
            eprintln!(
                "Could not save history ({}). It will be saved with the next round.",
                e
            );
        }
        let state = game.state();
        let shown = match (state.analysis(), state.scenario()) {
            (Some(analysis), Some(scenario)) if state.phase() == Phase::Result => {
                print!("{}", render_analysis(analysis, scenario, choice));
                print!("{}", render_share(analysis, scenario, choice));
                true
            }
            _ => false,
        };
        if shown {
            round += 1;
        } else {
            give_up_unless_retry(game, input).await?;
        }
    }
    Ok(())
}

/// Show the error screen and ask whether to try the round again.
async fn give_up_unless_retry(game: &Game, input: &mut InputLines) -> anyhow::Result<()> {
    let message = game.state().error_message().unwrap_or("Request failed");
    eprintln!("{}", message);

    if confirm(input, "Try again? [y/N]: ").await? {
        Ok(())
    } else {
        anyhow::bail!("{}", message)
    }
}

/// Ask until the player picks a track. `None` on end of input.
async fn read_choice(input: &mut InputLines) -> anyhow::Result<Option<TrackId>> {
    loop {
        prompt("\nYour move [a = do nothing / b = pull the lever]: ").await?;
        let Some(line) = input.next_line().await? else {
            return Ok(None);
        };
        match line.parse::<TrackId>() {
            Ok(choice) => return Ok(Some(choice)),
            Err(_) => println!("Type 'a' or 'b'."),
        }
    }
}

async fn confirm(input: &mut InputLines, question: &str) -> anyhow::Result<bool> {
    prompt(question).await?;
    let answer = input.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn prompt(text: &str) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
