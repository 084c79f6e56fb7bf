//! Interactive extraction command handler.

use inkwell::{
    ExtractionConfig, ExtractionPipeline, InkwellResult, InkwellSettings, KnownWorld, LlmPolicy,
    MergePolicy, ModelExtractor, ProviderSelection, StorageError, StorageErrorKind,
    TypeConflictPolicy, build_driver, read_json, write_json,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Arguments of `inkwell extract`.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub script: PathBuf,
    pub world: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub llm: Option<LlmPolicy>,
    pub merge: Option<MergePolicy>,
    pub type_conflicts: Option<TypeConflictPolicy>,
    pub output: Option<PathBuf>,
}

async fn read_text(path: &Path) -> InkwellResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e))).into()
    })
}

/// Run the interactive pipeline over one script and emit the proposal.
pub async fn run_extract(options: ExtractOptions, settings: &InkwellSettings) -> InkwellResult<()> {
    let text = read_text(&options.script).await?;
    let world = match &options.world {
        Some(path) => read_json::<KnownWorld>(path).await?,
        None => KnownWorld::default(),
    };
    let config = match &options.config {
        Some(path) => read_json::<ExtractionConfig>(path).await?,
        None => ExtractionConfig::default(),
    };

    let mut extraction = settings.extraction().clone();
    if let Some(policy) = options.llm {
        extraction = extraction.with_llm_policy(policy);
    }
    if let Some(policy) = options.merge {
        extraction = extraction.with_merge_policy(policy);
    }
    if let Some(policy) = options.type_conflicts {
        extraction = extraction.with_type_conflicts(policy);
    }

    let wants_model = *extraction.llm_policy() != LlmPolicy::Never;
    let mut pipeline: ExtractionPipeline = ExtractionPipeline::new(extraction)?;
    if wants_model {
        match ProviderSelection::from_env() {
            Ok(selection) => {
                let driver = build_driver(&selection, settings.provider())?;
                pipeline = pipeline
                    .with_model(ModelExtractor::new(driver).with_provider_settings(settings.provider()));
            }
            Err(e) => warn!(error = %e, "Continuing without the model pass"),
        }
    }

    let proposal = pipeline.propose(&text, &world, &config).await;

    match &options.output {
        Some(path) => {
            write_json(path, &proposal).await?;
            info!(path = %path.display(), "Proposal written");
        }
        None => {
            let json = serde_json::to_string_pretty(&proposal)
                .map_err(|e| inkwell::JsonError::new(e.to_string()))?;
            println!("{}", json);
        }
    }
    Ok(())
}
