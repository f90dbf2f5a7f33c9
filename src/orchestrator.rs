use clap::ValueEnum;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Pipeline steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Step {
    Synthesize,
    Relocate,
    Patch,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Synthesize, Step::Relocate, Step::Patch];

    /// Subcommand of `vocab-audio` that performs the step.
    pub fn command(&self) -> &'static str {
        match self {
            Step::Synthesize => "synthesize",
            Step::Relocate => "relocate",
            Step::Patch => "patch",
        }
    }
}

/// Runs one step to completion and reports whether it succeeded.
pub trait StepRunner {
    fn run(&mut self, step: Step) -> io::Result<bool>;
}

/// Runs each step as a child `vocab-audio` process sharing our stdio.
pub struct ProcessRunner {
    binary: PathBuf,
    config: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new(binary: PathBuf, config: Option<PathBuf>) -> Self {
        Self { binary, config }
    }
}

impl StepRunner for ProcessRunner {
    fn run(&mut self, step: Step) -> io::Result<bool> {
        let mut cmd = Command::new(&self.binary);
        if let Some(config) = &self.config {
            cmd.arg("--config").arg(config);
        }
        let status = cmd.arg(step.command()).status()?;
        if !status.success() {
            log::debug!("{} exited with {}", step.command(), status);
        }
        Ok(status.success())
    }
}

/// `vocab-audio` next to the running executable.
pub fn sibling_binary(name: &str) -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))?;
    Ok(dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Completed { failed: Vec<Step> },
    Aborted { at: Step },
}

/// Run `steps` in order. When one fails, `proceed` decides whether to go on.
/// Nothing is rolled back.
pub fn run_pipeline(
    steps: &[Step],
    runner: &mut dyn StepRunner,
    proceed: &mut dyn FnMut(Step) -> bool,
    pause: Duration,
) -> SetupOutcome {
    let mut failed = Vec::new();

    for (i, step) in steps.iter().enumerate() {
        println!("\n===== RUNNING {} =====\n", step.command());

        let ok = match runner.run(*step) {
            Ok(ok) => ok,
            Err(e) => {
                log::error!("Could not start {}: {}", step.command(), e);
                false
            }
        };

        if !ok {
            println!(
                "\nError running {}. Please check the output above for details.",
                step.command()
            );
            failed.push(*step);
            if !proceed(*step) {
                println!("Setup aborted.");
                return SetupOutcome::Aborted { at: *step };
            }
        }

        if i + 1 < steps.len() && !pause.is_zero() {
            thread::sleep(pause);
        }
    }

    SetupOutcome::Completed { failed }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        results: Vec<io::Result<bool>>,
        ran: Vec<Step>,
    }

    impl StepRunner for Scripted {
        fn run(&mut self, step: Step) -> io::Result<bool> {
            self.ran.push(step);
            self.results.remove(0)
        }
    }

    fn scripted(results: Vec<io::Result<bool>>) -> Scripted {
        Scripted {
            results,
            ran: Vec::new(),
        }
    }

    #[test]
    fn test_all_steps_succeed() {
        let mut runner = scripted(vec![Ok(true), Ok(true), Ok(true)]);
        let mut asked = 0;
        let outcome = run_pipeline(
            &Step::ALL,
            &mut runner,
            &mut |_| {
                asked += 1;
                true
            },
            Duration::ZERO,
        );
        assert_eq!(outcome, SetupOutcome::Completed { failed: vec![] });
        assert_eq!(runner.ran, Step::ALL.to_vec());
        assert_eq!(asked, 0);
    }

    #[test]
    fn test_failure_then_continue() {
        let mut runner = scripted(vec![
            Err(io::Error::new(io::ErrorKind::NotFound, "gone")),
            Ok(true),
            Ok(false),
        ]);
        let outcome = run_pipeline(&Step::ALL, &mut runner, &mut |_| true, Duration::ZERO);
        assert_eq!(
            outcome,
            SetupOutcome::Completed {
                failed: vec![Step::Synthesize, Step::Patch]
            }
        );
        assert_eq!(runner.ran.len(), 3);
    }

    #[test]
    fn test_failure_then_abort() {
        let mut runner = scripted(vec![Ok(true), Ok(false), Ok(true)]);
        let outcome = run_pipeline(&Step::ALL, &mut runner, &mut |_| false, Duration::ZERO);
        assert_eq!(outcome, SetupOutcome::Aborted { at: Step::Relocate });
        assert_eq!(runner.ran, vec![Step::Synthesize, Step::Relocate]);
    }

    #[test]
    fn test_process_runner_missing_binary() {
        let mut runner = ProcessRunner::new(PathBuf::from("/nonexistent/vocab-audio"), None);
        assert!(runner.run(Step::Patch).is_err());
    }
}
