//! End-to-end interactive extraction with a scripted model.

mod test_utils;

use inkwell_core::{
    EntityType, ExtractionConfig, ExtractionSettings, KnownEntity, KnownWorld, LlmPolicy,
    MergePolicy, NormalizedName, Proposal,
};
use inkwell_error::ProviderErrorKind;
use inkwell_extract::{ExtractionPipeline, ModelExtractor};
use test_utils::{MockDriver, settings};

fn pipeline(
    settings: ExtractionSettings,
    driver: &MockDriver,
) -> anyhow::Result<ExtractionPipeline<MockDriver>> {
    Ok(ExtractionPipeline::<MockDriver>::new(settings)?
        .with_model(ModelExtractor::new(driver.clone())))
}

async fn propose_plain(
    settings: ExtractionSettings,
    driver: &MockDriver,
    text: &str,
) -> anyhow::Result<Proposal> {
    Ok(pipeline(settings, driver)?
        .propose(text, &KnownWorld::default(), &ExtractionConfig::default())
        .await)
}

#[tokio::test]
async fn test_model_primary_merge_keeps_model_description() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(
        r#"{"entities": [{"entity_type": "character", "name": "Maya", "confidence": 0.85,
            "description": "Keeper of the north light",
            "evidence": [{"block_type": "line", "block_index": 0, "snippet": "MAYA"}]}]}"#,
    );

    let proposal = propose_plain(
        settings(LlmPolicy::Always, MergePolicy::ModelPrimary),
        &driver,
        "MAYA\n  Keep the lamp lit.",
    )
    .await?;

    assert_eq!(proposal.new_entities.len(), 1);
    let maya = &proposal.new_entities[0];
    assert_eq!(maya.normalized_name(), NormalizedName::new("maya"));
    assert_eq!(maya.description.as_deref(), Some("Keeper of the north light"));
    assert!(proposal.meta.llm_used);
    assert_eq!(driver.call_count(), 1);

    let prompt = driver.last_prompt().unwrap_or_default();
    assert!(prompt.contains("Already found"));
    assert!(prompt.contains("- Maya (character)"));
    assert!(prompt.contains("[1]   Keep the lamp lit."));
    Ok(())
}

#[tokio::test]
async fn test_deterministic_primary_keeps_rule_candidate() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(
        r#"{"entities": [{"entity_type": "character", "name": "Maya", "confidence": 0.85,
            "description": "Keeper of the north light",
            "evidence": [{"block_type": "line", "block_index": 0, "snippet": "MAYA"}]}]}"#,
    );

    let proposal = propose_plain(
        settings(LlmPolicy::Always, MergePolicy::DeterministicPrimary),
        &driver,
        "MAYA\n  Keep the lamp lit.",
    )
    .await?;

    assert_eq!(proposal.new_entities.len(), 1);
    assert_eq!(proposal.new_entities[0].description, None);
    assert_eq!(proposal.new_entities[0].confidence, 0.9);
    Ok(())
}

#[tokio::test]
async fn test_model_runs_only_when_ambiguous() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(
        r#"{"entities": [{"entity_type": "faction", "name": "The Syndicate", "confidence": 0.75,
            "evidence": [{"block_type": "line", "block_index": 1, "snippet": "THE SYNDICATE watches"}]}]}"#,
    );
    let policy = settings(LlmPolicy::WhenAmbiguous, MergePolicy::DeterministicPrimary);

    let clear = propose_plain(policy.clone(), &driver, "INT. WAREHOUSE - NIGHT").await?;
    assert!(!clear.meta.llm_used);
    assert_eq!(driver.call_count(), 0);

    let murky = propose_plain(
        policy,
        &driver,
        "INT. WAREHOUSE - NIGHT\nTHE SYNDICATE watches from the shadows.",
    )
    .await?;
    assert!(murky.meta.llm_used);
    assert_eq!(driver.call_count(), 1);
    assert_eq!(murky.meta.ambiguous_phrases, vec!["THE SYNDICATE".to_string()]);

    let names = murky
        .new_entities
        .iter()
        .map(|e| (e.name.as_str(), e.entity_type))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        [
            ("Warehouse", EntityType::Location),
            ("The Syndicate", EntityType::Faction)
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_never_policy_skips_model() -> anyhow::Result<()> {
    let driver = MockDriver::new_success("{}");
    let proposal = propose_plain(
        settings(LlmPolicy::Never, MergePolicy::DeterministicPrimary),
        &driver,
        "THE SYNDICATE watches from the shadows.",
    )
    .await?;

    assert_eq!(driver.call_count(), 0);
    assert!(!proposal.meta.llm_used);
    assert!(proposal.meta.warnings.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_provider_failure_degrades_to_warning() -> anyhow::Result<()> {
    let driver = MockDriver::new_error(ProviderErrorKind::Timeout("deadline elapsed".into()));

    let proposal = propose_plain(
        settings(LlmPolicy::Always, MergePolicy::DeterministicPrimary),
        &driver,
        "INT. APARTMENT - NIGHT",
    )
    .await?;

    assert_eq!(proposal.new_entities.len(), 1);
    assert_eq!(proposal.new_entities[0].name, "Apartment");
    assert_eq!(proposal.meta.warnings.len(), 1);
    assert!(proposal.meta.warnings[0].contains("model pass skipped"));
    assert!(proposal.meta.warnings[0].contains("timed out"));
    assert!(proposal.meta.llm_used);
    Ok(())
}

#[tokio::test]
async fn test_non_json_response_degrades_to_warning() -> anyhow::Result<()> {
    let driver = MockDriver::new_success("Sorry, I can't help with that.");

    let proposal = propose_plain(
        settings(LlmPolicy::Always, MergePolicy::ModelPrimary),
        &driver,
        "ELI\n  I've been searching for years.",
    )
    .await?;

    assert_eq!(proposal.new_entities.len(), 1);
    assert_eq!(proposal.new_entities[0].name, "Eli");
    assert!(proposal.meta.warnings[0].contains("No JSON found"));
    Ok(())
}

#[tokio::test]
async fn test_overlong_snippet_drops_model_item() -> anyhow::Result<()> {
    let line = "Maya lowers the old brass lantern into the churning black water below the pier.";
    let thirteen_words = "Maya lowers the old brass lantern into the churning black water below the";
    let driver = MockDriver::new_success(format!(
        r#"{{"entities": [{{"entity_type": "item", "name": "Brass Lantern", "confidence": 0.8,
            "evidence": [{{"block_type": "line", "block_index": 0, "snippet": "{}"}}]}}]}}"#,
        thirteen_words
    ));

    let proposal = propose_plain(
        settings(LlmPolicy::Always, MergePolicy::ModelPrimary),
        &driver,
        line,
    )
    .await?;

    assert!(proposal.new_entities.is_empty());
    assert_eq!(proposal.meta.warnings.len(), 1);
    assert!(proposal.meta.warnings[0].contains("snippet exceeds word limit"));
    Ok(())
}

#[tokio::test]
async fn test_canon_locked_names_never_proposed() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(
        r#"{
            "entities": [{"entity_type": "faction", "name": "The Syndicate", "confidence": 0.75,
                "evidence": [{"block_type": "line", "block_index": 1, "snippet": "THE SYNDICATE"}]}],
            "updated_entities": [{"name": "Brass Key", "changes": {"holder": "Maya"}, "confidence": 0.7,
                "evidence": [{"block_type": "line", "block_index": 2, "snippet": "Maya pockets the Brass Key."}]}]
        }"#,
    );
    let world = KnownWorld {
        items: vec![KnownEntity::new("i1", "Brass Key")],
        ..Default::default()
    };
    let config = ExtractionConfig::new(
        vec![],
        vec!["the syndicate".into(), "Apartment".into(), "BRASS KEY".into()],
        vec![],
    );

    let proposal = pipeline(
        settings(LlmPolicy::Always, MergePolicy::ModelPrimary),
        &driver,
    )?
    .propose(
        "INT. APARTMENT - NIGHT\nTHE SYNDICATE watches.\nMaya pockets the Brass Key.",
        &world,
        &config,
    )
    .await;

    let locks = config.canon_lock_set();
    assert!(proposal
        .new_entities
        .iter()
        .all(|e| !locks.contains(&e.normalized_name())));
    assert!(proposal
        .updated_entities
        .iter()
        .all(|u| !locks.contains(&u.normalized_name())));
    assert!(proposal.is_empty());
    assert_eq!(
        proposal
            .meta
            .warnings
            .iter()
            .filter(|w| w.starts_with("suppressed canon-locked"))
            .count(),
        3
    );
    Ok(())
}

#[tokio::test]
async fn test_prompt_lists_known_names_and_truncates() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(r#"{"entities": []}"#);
    let world = KnownWorld {
        characters: vec![KnownEntity::new("c1", "Maya")],
        ..Default::default()
    };
    let policy = settings(LlmPolicy::Always, MergePolicy::DeterministicPrimary)
        .with_max_prompt_chars(22);

    let proposal = pipeline(policy, &driver)?
        .propose(
            "INT. APARTMENT - NIGHT\nMAYA\n  Who's there?",
            &world,
            &ExtractionConfig::default(),
        )
        .await;

    let prompt = driver.last_prompt().unwrap_or_default();
    assert!(prompt.contains("Known entities"));
    assert!(prompt.contains("- Maya"));
    assert!(prompt.contains("[0] INT. APARTMENT - NIGHT"));
    assert!(!prompt.contains("Who's there?"));
    assert!(proposal
        .meta
        .warnings
        .iter()
        .any(|w| w.contains("script truncated to 22 of")));
    Ok(())
}

#[tokio::test]
async fn test_proposal_serializes_camel_case() -> anyhow::Result<()> {
    let driver = MockDriver::new_success("{}");
    let proposal = propose_plain(
        settings(LlmPolicy::Never, MergePolicy::DeterministicPrimary),
        &driver,
        "INT. APARTMENT - NIGHT",
    )
    .await?;

    let json = serde_json::to_value(&proposal)?;
    assert_eq!(json["meta"]["lineCount"], 1);
    assert_eq!(json["meta"]["rawLength"], 22);
    assert_eq!(json["newEntities"][0]["tempId"], "det-location-1");
    assert_eq!(json["newEntities"][0]["evidence"][0]["blockType"], "line");
    assert!(json["updatedEntities"].as_array().is_some_and(Vec::is_empty));
    Ok(())
}

#[tokio::test]
async fn test_raw_length_counts_characters() -> anyhow::Result<()> {
    let driver = MockDriver::new_success("{}");
    let text = "INT. CAFÉ - DAY";
    let proposal = propose_plain(
        settings(LlmPolicy::Never, MergePolicy::DeterministicPrimary),
        &driver,
        text,
    )
    .await?;

    assert_eq!(text.len(), 16);
    assert_eq!(proposal.meta.raw_length, 15);
    Ok(())
}
