//! vocab-audio - build and wire up pronunciation audio for the vocabulary app.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use vocab_audio::backends;
use vocab_audio::player::{AudioEngine, AudioOutput, Silent};
use vocab_audio::{prompt, pruner, relocator, screen, synthesizer};
use vocab_audio::{Error, Settings, VocabularyDocument};

/// Pronunciation audio pipeline for the vocabulary app
#[derive(Parser)]
#[command(name = "vocab-audio")]
#[command(author = "StarTuz")]
#[command(version)]
#[command(about = "Synthesize, prune, relocate and wire up vocabulary audio", long_about = None)]
struct Cli {
    /// Extra config file layered over Vocab.* and the user config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize audio for every vocabulary word into the staging tree
    Synthesize {
        /// Play each file back after saving it
        #[arg(short, long)]
        play: bool,
        /// TTS backend: google or espeak
        #[arg(short, long)]
        backend: Option<String>,
        /// Language code (e.g., en)
        #[arg(short, long)]
        language: Option<String>,
        /// Slow speech
        #[arg(long)]
        slow: bool,
    },

    /// Delete intermediate audio files from the staging tree
    Prune {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Extension to delete (default: prune_extension)
        #[arg(short, long)]
        extension: Option<String>,
        /// Directory to clean (default: staging_root)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Copy staged audio into the app and write the annotated manifest
    Relocate {
        /// Only annotate words whose audio was actually copied
        #[arg(long)]
        require_copied: bool,
    },

    /// Add soundFile references to the screen components
    Patch {
        /// Directory holding the screen sources
        #[arg(short, long)]
        screens_dir: Option<PathBuf>,
    },

    /// Print the effective configuration
    Paths,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, mut settings: Settings) -> Result<(), Error> {
    match command {
        Commands::Synthesize {
            play,
            backend,
            language,
            slow,
        } => {
            if let Some(b) = backend {
                settings.tts_backend = b;
            }
            if let Some(l) = language {
                settings.tts_language = l;
            }
            settings.tts_slow |= slow;
            settings.verify_playback |= play;
            settings.validate()?;

            let doc = VocabularyDocument::load(&settings.vocabulary_path)?;
            let backend = backends::create_backend(&settings)?;
            let player: Box<dyn AudioOutput> = if settings.verify_playback {
                Box::new(AudioEngine::new())
            } else {
                Box::new(Silent)
            };

            let report = synthesizer::synthesize_all(&doc, backend.as_ref(), player.as_ref(), &settings)?;
            if report.failed > 0 {
                println!("{} of {} words failed.", report.failed, report.total);
            }
        }

        Commands::Prune {
            yes,
            extension,
            root,
        } => {
            let root = root.unwrap_or_else(|| settings.staging_root.clone());
            let ext = extension.unwrap_or_else(|| settings.prune_extension().to_string());
            let ext = ext.trim_start_matches('.').to_string();
            settings.check_prune_extension(&ext)?;
            if !root.is_dir() {
                return Err(Error::MissingInput {
                    what: "directory",
                    path: root,
                });
            }

            println!(
                "This will delete ALL .{} files in '{}' and its subdirectories.",
                ext,
                root.display()
            );
            if !yes && !prompt::confirm_stdin("Are you sure you want to continue?") {
                println!("Operation canceled.");
                return Ok(());
            }

            let report = pruner::prune(&root, &ext);
            println!("\nCleanup complete!");
            println!(
                "Deleted {} {} files ({:.1} KB)",
                report.deleted,
                ext.to_uppercase(),
                report.kilobytes()
            );
            if report.failures > 0 {
                println!("{} files could not be deleted.", report.failures);
            }
        }

        Commands::Relocate { require_copied } => {
            settings.require_copied_audio |= require_copied;
            relocator::relocate(&settings)?;
            println!("\nDone! Now update your components to use the sound files.");
        }

        Commands::Patch { screens_dir } => {
            if let Some(dir) = screens_dir {
                settings.screens_dir = dir;
            }
            println!("Updating components to use sound files from vocabulary...");
            let report = screen::run(&settings)?;
            println!(
                "\nDone! Updated {} components with vocabulary sound files.",
                report.files_updated
            );
        }

        Commands::Paths => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
