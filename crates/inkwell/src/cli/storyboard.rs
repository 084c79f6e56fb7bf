//! Batch storyboard command handler.

use inkwell::{
    InkwellResult, InkwellSettings, ProviderSelection, StoryboardGenerator, build_driver,
    read_script, write_json,
};
use std::path::PathBuf;
use tracing::info;

/// Generate, validate and atomically write a storyboard.
///
/// Nothing is written unless the document passes coverage and grounding.
pub async fn run_storyboard(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    settings: &InkwellSettings,
) -> InkwellResult<()> {
    let input = input.unwrap_or_else(|| settings.storyboard().default_input().clone());
    let output = output.unwrap_or_else(|| settings.storyboard().default_output().clone());

    let script = read_script(&input).await?;
    let selection = ProviderSelection::from_env()?;
    let driver = build_driver(&selection, settings.provider())?;

    let document = StoryboardGenerator::new(driver)
        .with_max_prompt_chars(*settings.storyboard().max_prompt_chars())
        .with_provider_settings(settings.provider())
        .generate(&script)
        .await?;

    write_json(&output, &document).await?;
    info!(
        input = %input.display(),
        output = %output.display(),
        units = document.manifest.len(),
        "Storyboard written"
    );
    Ok(())
}
