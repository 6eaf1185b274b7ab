// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `ask`, `train` and `correct`,
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_use_case::FineTuneConfig;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a torque question using the solver and the explainer model
    Ask(AskArgs),

    /// Fine-tune the explainer on corrections plus the curated set
    Train(TrainArgs),

    /// Record a corrected answer for the next training run
    Correct(CorrectArgs),
}

/// All arguments for the `ask` command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The natural language torque question to answer
    #[arg(long)]
    pub question: String,

    /// Directory where a fine-tuned checkpoint may live
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Tab-separated correction log consumed by this run
    #[arg(long, default_value = "user_corrections.txt")]
    pub corrections_file: String,

    /// Directory to save the model checkpoint and tokenizer
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Maximum number of tokens per prompt or target sequence
    #[arg(long, default_value_t = 128)]
    pub max_seq_len: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 2)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Fixed learning rate — low, for stability on a small dataset
    #[arg(long, default_value_t = 1e-5)]
    pub lr: f64,

    /// Hidden dimension of the transformer (d_model in the paper)
    #[arg(long, default_value_t = 256)]
    pub d_model: usize,

    /// Number of attention heads — d_model must be divisible by this
    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    /// Number of stacked encoder layers
    #[arg(long, default_value_t = 3)]
    pub num_encoder_layers: usize,

    /// Number of stacked decoder layers
    #[arg(long, default_value_t = 3)]
    pub num_decoder_layers: usize,

    /// Inner dimension of the feed-forward network
    #[arg(long, default_value_t = 1024)]
    pub d_ff: usize,

    /// Dropout probability during training
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Upper bound on tokenizer vocabulary / embedding table size
    #[arg(long, default_value_t = 4096)]
    pub vocab_size: usize,
}

/// Convert CLI TrainArgs into the application-layer FineTuneConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for FineTuneConfig {
    fn from(a: TrainArgs) -> Self {
        FineTuneConfig {
            corrections_file:   a.corrections_file,
            checkpoint_dir:     a.checkpoint_dir,
            max_seq_len:        a.max_seq_len,
            batch_size:         a.batch_size,
            epochs:             a.epochs,
            lr:                 a.lr,
            d_model:            a.d_model,
            num_heads:          a.num_heads,
            num_encoder_layers: a.num_encoder_layers,
            num_decoder_layers: a.num_decoder_layers,
            d_ff:               a.d_ff,
            dropout:            a.dropout,
            vocab_size:         a.vocab_size,
        }
    }
}

/// All arguments for the `correct` command
#[derive(Args, Debug)]
pub struct CorrectArgs {
    /// The question that was answered wrongly
    #[arg(long)]
    pub question: String,

    /// The corrected answer text
    #[arg(long)]
    pub answer: String,

    /// Tab-separated correction log to append to
    #[arg(long, default_value = "user_corrections.txt")]
    pub corrections_file: String,
}
