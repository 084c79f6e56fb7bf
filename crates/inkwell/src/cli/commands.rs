//! CLI command definitions.

use clap::{Parser, Subcommand};
use inkwell::{LlmPolicy, MergePolicy, TypeConflictPolicy};
use std::path::PathBuf;

/// Inkwell - grounded entity extraction and storyboard validation for scripts
#[derive(Parser, Debug)]
#[command(name = "inkwell")]
#[command(about = "Grounded entity extraction and storyboard validation for scripts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Propose entities, updates and timeline events for a raw text script
    Extract {
        /// Path to the script text
        script: PathBuf,

        /// Known-entity snapshot (JSON)
        #[arg(long)]
        world: Option<PathBuf>,

        /// Extraction config with known names, canon locks and custom patterns (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// When to call the model: never, when_ambiguous, always
        #[arg(long)]
        llm: Option<LlmPolicy>,

        /// Which pass wins on duplicates: deterministic_primary, model_primary
        #[arg(long)]
        merge: Option<MergePolicy>,

        /// How to treat conflicting entity types: surface_both, prefer_primary
        #[arg(long)]
        type_conflicts: Option<TypeConflictPolicy>,

        /// Write the proposal here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Generate a validated storyboard from a normalized comic script
    Storyboard {
        /// Normalized script JSON (default from settings: out/normalized.json)
        input: Option<PathBuf>,

        /// Output path (default from settings: out/parsed/storyboard.json)
        output: Option<PathBuf>,
    },
}
