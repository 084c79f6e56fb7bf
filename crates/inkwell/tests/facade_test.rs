//! The facade wires extraction, grounding and atomic output together.

use inkwell::{
    CustomPattern, EntityType, ExtractionConfig, ExtractionPipeline, ExtractionSettings,
    KnownEntity, KnownWorld, LlmPolicy, Proposal, TimelineAction, read_json, write_json,
};
use tempfile::TempDir;

const SCENE: &str = "\
INT. LIGHTHOUSE - NIGHT

MAYA
  Keep the lamp lit.

Eli picks up the brass compass.
Agent Vale of the Lantern Guild arrives.";

#[tokio::test]
async fn test_rules_only_proposal_round_trips_through_disk() -> anyhow::Result<()> {
    let settings = ExtractionSettings::default().with_llm_policy(LlmPolicy::Never);
    let pipeline: ExtractionPipeline = ExtractionPipeline::new(settings)?;

    let world = KnownWorld {
        characters: vec![KnownEntity::new("c-maya", "Maya").at_location("l-harbor")],
        locations: vec![KnownEntity::new("l-harbor", "Harbor")],
        ..Default::default()
    };
    let config = ExtractionConfig::new(
        vec![],
        vec![],
        vec![CustomPattern::new(
            r"(?:the\s+)?([A-Z][a-z]+\s+Guild)",
            EntityType::Faction,
            "guild",
        )],
    );

    let proposal = pipeline.propose(SCENE, &world, &config).await;

    let names = proposal
        .new_entities
        .iter()
        .map(|e| (e.name.as_str(), e.entity_type))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        [
            ("Lighthouse", EntityType::Location),
            ("Brass Compass", EntityType::Item),
            ("Lantern Guild", EntityType::Faction),
        ]
    );
    assert!(proposal
        .timeline_events
        .iter()
        .any(|event| event.action == TimelineAction::MovedTo
            && event.entity_name.as_deref() == Some("Maya")));
    assert!(!proposal.meta.llm_used);
    assert_eq!(proposal.meta.line_count, 7);

    let dir = TempDir::new()?;
    let path = dir.path().join("proposal.json");
    write_json(&path, &proposal).await?;
    let loaded: Proposal = read_json(&path).await?;
    assert_eq!(loaded, proposal);
    Ok(())
}
