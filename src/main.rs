//! Unmo bot: console entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at configured level
//!   4. Load the dictionary (missing files are created empty)
//!   5. Spawn Ctrl-C → shutdown signal watcher
//!   6. Run the console until an empty line, EOF, or Ctrl-C
//!   7. Save the dictionary

use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::info;

use unmo_bot::analyzer::ScriptAnalyzer;
use unmo_bot::dictionary::Dictionary;
use unmo_bot::engine::Engine;
use unmo_bot::error::AppError;
use unmo_bot::training::TrainingQueue;
use unmo_bot::{config, console, logger};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    // After Ctrl-C the stdin reader is still parked in a blocking read that
    // would hold up runtime teardown.
    std::process::exit(0);
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; errors are ignored (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level, config.log_file.as_deref())?;

    info!(
        bot_name = %config.bot_name,
        dict_dir = %config.dict_dir.display(),
        log_level = %config.log_level,
        "config loaded"
    );

    let dictionary = Dictionary::load(config.dictionary_paths())?;
    let mut engine = Engine::new(config.bot_name.clone(), dictionary, Box::new(ScriptAnalyzer));
    let mut queue = TrainingQueue::new(config.training_queue_cap);

    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    console::run(&mut engine, &mut queue, stdin, &mut stdout, shutdown).await?;

    engine.save()?;
    println!("✓ Dictionary saved to {}", config.dict_dir.display());
    Ok(())
}
