//! Storyboard generation against a scripted model.

mod test_utils;

use inkwell_core::{ManifestEntry, NormalizedScript};
use inkwell_error::{
    CoverageErrorKind, GroundingErrorKind, InkwellErrorKind, ProviderErrorKind,
    ResponseFormatErrorKind, UnitRef,
};
use inkwell_storyboard::StoryboardGenerator;
use serde_json::json;
use test_utils::{MockDriver, harbor_response, harbor_script};

#[tokio::test]
async fn test_valid_answer_becomes_document() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(harbor_response(None).to_string());
    let script = harbor_script();

    let document = StoryboardGenerator::new(driver.clone()).generate(&script).await?;

    assert_eq!(driver.call_count(), 1);
    assert_eq!(document.manifest, script.manifest());
    assert_eq!(document.manifest.len(), 5);
    assert_eq!(document.ink.len(), 5);
    assert_eq!(document.proof.len(), 5);
    assert_eq!(document.meta.panel_count, 5);
    assert_eq!(document.meta.provider, "mock");
    assert_eq!(document.meta.model, "mock-model");
    assert_eq!(document.proof[0].speakers, vec!["MAYA".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_prompt_lists_manifest_and_blocks() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(harbor_response(None).to_string());
    StoryboardGenerator::new(driver.clone())
        .generate(&harbor_script())
        .await?;

    let prompt = driver.last_prompt().unwrap_or_default();
    assert!(prompt.starts_with("Required units (5): (page 1, panel 1), (page 1, panel 2)"));
    assert!(prompt.contains("    [1] dialogue (MAYA): Keep the lamp lit.\n"));
    assert!(prompt.contains("Page 2\n  Panel 1\n"));
    Ok(())
}

#[tokio::test]
async fn test_missing_panel_fails_coverage() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(harbor_response(Some((1, 3))).to_string());

    let err = StoryboardGenerator::new(driver)
        .generate(&harbor_script())
        .await
        .unwrap_err();

    assert!(err.is_validation_failure());
    let InkwellErrorKind::Coverage(coverage) = err.kind() else {
        panic!("expected a coverage error, got {}", err);
    };
    assert_eq!(
        coverage.kind,
        CoverageErrorKind::Missing {
            collection: "coverage".to_string(),
            units: vec![UnitRef { page: 1, panel: 3 }],
        }
    );
    assert!(err.to_string().contains("page 1 panel 3"));
    Ok(())
}

#[tokio::test]
async fn test_collapsed_answer_fails_coverage() -> anyhow::Result<()> {
    let mut response = harbor_response(None);
    for collection in ["coverage", "ink", "proof"] {
        if let Some(entries) = response[collection].as_array_mut() {
            entries.truncate(1);
        }
    }
    let driver = MockDriver::new_success(response.to_string());

    let err = StoryboardGenerator::new(driver)
        .generate(&harbor_script())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        InkwellErrorKind::Coverage(c) if matches!(
            c.kind,
            CoverageErrorKind::Collapsed { dimension: "page", expected: 2, .. }
        )
    ));
    Ok(())
}

#[tokio::test]
async fn test_paraphrased_snippet_fails_grounding() -> anyhow::Result<()> {
    let mut response = harbor_response(None);
    response["proof"][2]["evidence"][0]["snippet"] = json!("I have been searching");
    let driver = MockDriver::new_success(response.to_string());

    let err = StoryboardGenerator::new(driver)
        .generate(&harbor_script())
        .await
        .unwrap_err();

    assert!(err.is_validation_failure());
    let InkwellErrorKind::Grounding(grounding) = err.kind() else {
        panic!("expected a grounding error, got {}", err);
    };
    assert_eq!(grounding.subject, "proof p1/panel3");
    assert!(matches!(grounding.kind, GroundingErrorKind::SnippetNotFound { index: 0, .. }));
    Ok(())
}

#[tokio::test]
async fn test_long_snippet_fails_grounding() -> anyhow::Result<()> {
    let script: NormalizedScript = serde_json::from_value(json!({
        "pages": [{"page_number": 1, "panels": [{"panel_number": 1, "blocks": [{
            "type": "caption",
            "text": "Maya lowers the old brass lantern into the churning black water below the pier."
        }]}]}]
    }))?;
    let evidence = json!([{
        "blockType": "caption",
        "blockIndex": 0,
        "snippet": "Maya lowers the old brass lantern into the churning black water below the"
    }]);
    let response = json!({
        "coverage": [{"page": 1, "panel": 1}],
        "ink": [{"page": 1, "panel": 1, "beat": "The lantern sinks.", "evidence": evidence}],
        "proof": [{"page": 1, "panel": 1, "speakers": [], "evidence": evidence}],
    });
    let driver = MockDriver::new_success(response.to_string());

    let err = StoryboardGenerator::new(driver)
        .generate(&script)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("snippet exceeds word limit"));
    assert!(matches!(
        err.kind(),
        InkwellErrorKind::Grounding(g) if g.kind == GroundingErrorKind::SnippetTooLong { words: 13, limit: 12 }
    ));
    Ok(())
}

#[tokio::test]
async fn test_wrong_block_type_fails_grounding() -> anyhow::Result<()> {
    let mut response = harbor_response(None);
    response["ink"][1]["evidence"][0]["blockType"] = json!("dialogue");
    let driver = MockDriver::new_success(response.to_string());

    let err = StoryboardGenerator::new(driver)
        .generate(&harbor_script())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        InkwellErrorKind::Grounding(g) if g.subject == "ink p1/panel2"
            && matches!(g.kind, GroundingErrorKind::BlockTypeMismatch { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_entry_without_evidence_fails_grounding() -> anyhow::Result<()> {
    let mut response = harbor_response(None);
    response["ink"][4]["evidence"] = json!([]);
    let driver = MockDriver::new_success(response.to_string());

    let err = StoryboardGenerator::new(driver)
        .generate(&harbor_script())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        InkwellErrorKind::Grounding(g) if g.kind == GroundingErrorKind::MissingEvidence
    ));
    Ok(())
}

#[tokio::test]
async fn test_provider_failure_is_fatal_without_retry() -> anyhow::Result<()> {
    let driver = MockDriver::new_error(ProviderErrorKind::Timeout("deadline elapsed".into()));

    let err = StoryboardGenerator::new(driver.clone())
        .generate(&harbor_script())
        .await
        .unwrap_err();

    assert_eq!(driver.call_count(), 1);
    assert!(matches!(err.kind(), InkwellErrorKind::Provider(_)));
    assert!(!err.is_validation_failure());
    Ok(())
}

#[tokio::test]
async fn test_prose_answer_is_format_error() -> anyhow::Result<()> {
    let driver = MockDriver::new_success("I could not read the script, sorry.");

    let err = StoryboardGenerator::new(driver)
        .generate(&harbor_script())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        InkwellErrorKind::ResponseFormat(f) if matches!(f.kind, ResponseFormatErrorKind::NoJson(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_answer_without_ink_is_schema_error() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(r#"```json
{"coverage": [], "proof": []}
```"#);

    let err = StoryboardGenerator::new(driver)
        .generate(&harbor_script())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        InkwellErrorKind::ResponseFormat(f) if matches!(f.kind, ResponseFormatErrorKind::Schema(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_empty_script_makes_no_call() -> anyhow::Result<()> {
    let driver = MockDriver::new_success("{}");

    let err = StoryboardGenerator::new(driver.clone())
        .generate(&NormalizedScript::default())
        .await
        .unwrap_err();

    assert_eq!(driver.call_count(), 0);
    assert!(matches!(
        err.kind(),
        InkwellErrorKind::Coverage(c) if c.kind == CoverageErrorKind::EmptyManifest
    ));
    Ok(())
}

#[tokio::test]
async fn test_repeated_panel_number_makes_no_call() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(harbor_response(None).to_string());
    let mut script = harbor_script();
    script.pages[0].panels[1].panel_number = 1;

    let err = StoryboardGenerator::new(driver.clone())
        .generate(&script)
        .await
        .unwrap_err();

    assert_eq!(driver.call_count(), 0);
    let InkwellErrorKind::Coverage(coverage) = err.kind() else {
        panic!("expected a coverage error, got {}", err);
    };
    assert_eq!(
        coverage.kind,
        CoverageErrorKind::Duplicate {
            collection: "manifest".to_string(),
            units: vec![UnitRef { page: 1, panel: 1 }],
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_oversized_script_makes_no_call() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(harbor_response(None).to_string());

    let err = StoryboardGenerator::new(driver.clone())
        .with_max_prompt_chars(40)
        .generate(&harbor_script())
        .await
        .unwrap_err();

    assert_eq!(driver.call_count(), 0);
    assert!(matches!(err.kind(), InkwellErrorKind::Config(_)));
    assert!(err.to_string().contains("prompt cap"));
    Ok(())
}

#[tokio::test]
async fn test_document_serializes_camel_case() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(harbor_response(None).to_string());
    let document = StoryboardGenerator::new(driver)
        .generate(&harbor_script())
        .await?;

    let value = serde_json::to_value(&document)?;
    assert_eq!(value["meta"]["panelCount"], 5);
    assert_eq!(value["manifest"][4], json!({"page": 2, "panel": 2}));
    assert_eq!(value["ink"][0]["evidence"][0]["blockIndex"], 1);
    assert!(value["meta"]["generatedAt"].is_string());
    let _round_trip: ManifestEntry = serde_json::from_value(value["coverage"][0].clone())?;
    Ok(())
}
