//! vocab-setup - run the whole audio pipeline for the vocabulary app.
//!
//! Each step is a separate `vocab-audio` process; a failing step asks whether
//! to carry on with the next one.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use vocab_audio::orchestrator::{self, ProcessRunner, SetupOutcome, Step};
use vocab_audio::prompt;

/// Run synthesize, relocate and patch in sequence
#[derive(Parser)]
#[command(name = "vocab-setup")]
#[command(author = "StarTuz")]
#[command(version)]
#[command(about = "Set up audio for every vocabulary word of the app", long_about = None)]
struct Cli {
    /// Step to leave out (repeatable)
    #[arg(short, long, value_enum)]
    skip: Vec<Step>,

    /// vocab-audio binary to run (default: next to this executable)
    #[arg(short, long)]
    bin: Option<PathBuf>,

    /// Config file passed on to every step
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!("\n===== VOCABULARY APP AUDIO SETUP =====\n");

    println!("Checking prerequisites...");
    let binary = match cli.bin {
        Some(path) => path,
        None => match orchestrator::sibling_binary("vocab-audio") {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Cannot locate vocab-audio: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };
    if !binary.is_file() {
        eprintln!("\nError: '{}' not found!", binary.display());
        return ExitCode::FAILURE;
    }
    println!("Found {}", binary.display());

    let steps: Vec<Step> = Step::ALL
        .into_iter()
        .filter(|s| !cli.skip.contains(s))
        .collect();

    let mut runner = ProcessRunner::new(binary, cli.config);
    let outcome = orchestrator::run_pipeline(
        &steps,
        &mut runner,
        &mut |_| prompt::confirm_stdin("Continue with the next step?"),
        Duration::from_secs(1),
    );

    match outcome {
        SetupOutcome::Aborted { .. } => ExitCode::FAILURE,
        SetupOutcome::Completed { failed } => {
            println!("\n===== SETUP COMPLETE =====");
            if !failed.is_empty() {
                let names: Vec<&str> = failed.iter().map(Step::command).collect();
                println!("Steps with errors: {}", names.join(", "));
            }
            println!("\nAudio files have been:");
            for (i, step) in steps.iter().enumerate() {
                let done = match step {
                    Step::Synthesize => "Synthesized into the staging directory",
                    Step::Relocate => "Copied to the app's sound assets and referenced in the vocabulary",
                    Step::Patch => "Referenced in the screen components",
                };
                println!("{}. {}", i + 1, done);
            }
            ExitCode::SUCCESS
        }
    }
}
