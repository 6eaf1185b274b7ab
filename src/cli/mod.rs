// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `ask`     — answers a torque question (solver + model)
//   2. `train`   — fine-tunes the explainer on corrections
//   3. `correct` — records a corrected answer for later training
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{AskArgs, Commands, CorrectArgs, TrainArgs};

use crate::application::train_use_case::FineTuneConfig;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "torque-qa",
    version = "0.1.0",
    about = "Answer torque physics questions with a deterministic solver and a fine-tunable explainer."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Ask(args)     => Self::run_ask(args),
            Commands::Train(args)   => Self::run_train(args),
            Commands::Correct(args) => Self::run_correct(args),
        }
    }

    /// Handles the `ask` subcommand: bring up the model lifecycle
    /// (fine-tuned checkpoint or stock) and answer one question.
    fn run_ask(args: AskArgs) -> Result<()> {
        use crate::application::answer_use_case::AnswerUseCase;
        use crate::ml::lifecycle::ModelLifecycle;

        let config = FineTuneConfig {
            checkpoint_dir: args.checkpoint_dir.clone(),
            ..FineTuneConfig::default()
        };
        let lifecycle = ModelLifecycle::initialize(&config)?;

        let use_case = AnswerUseCase::new(&lifecycle);
        let answer = use_case.answer_question(&args.question)?;
        println!("\n{answer}");
        Ok(())
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a FineTuneConfig and hands off to Layer 2.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;
        use crate::ml::lifecycle::ModelLifecycle;

        tracing::info!("Starting fine-tuning from '{}'", args.corrections_file);

        let config: FineTuneConfig = args.into();
        let lifecycle = ModelLifecycle::initialize(&config)?;

        let use_case = TrainUseCase::new(config);
        let report = use_case.execute(&lifecycle)?;

        if report.epoch_losses.is_empty() {
            println!("Nothing to train on. Model unchanged.");
        } else {
            println!("Fine-tuning complete: {} epochs. Checkpoint saved.", report.epoch_losses.len());
        }
        Ok(())
    }

    /// Handles the `correct` subcommand: append one (question,
    /// corrected answer) pair to the correction log.
    fn run_correct(args: CorrectArgs) -> Result<()> {
        use crate::data::corrections::CorrectionLog;

        let log = CorrectionLog::new(&args.corrections_file);
        log.append(&args.question, &args.answer)?;

        println!("Correction recorded. It will be used on the next training run.");
        Ok(())
    }
}
