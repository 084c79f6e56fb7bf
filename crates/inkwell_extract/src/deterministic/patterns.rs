//! Caller-supplied pattern rules.

use super::rules::{Effect, EntityDraft, LineContext, LineRule, compile};
use inkwell_core::CustomPattern;
use inkwell_error::ConfigError;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Compiled custom patterns for one extraction run.
///
/// Each distinct pattern string compiles once; a pattern that fails to compile
/// is reported once and skipped.
#[derive(Debug, Default)]
pub(crate) struct CustomPatternRule {
    patterns: Vec<(CustomPattern, Regex)>,
}

impl CustomPatternRule {
    /// Compile `patterns`, returning the rule and one error per bad pattern.
    pub fn compile(patterns: &[CustomPattern]) -> (Self, Vec<ConfigError>) {
        let mut cache: BTreeMap<&str, Option<Regex>> = BTreeMap::new();
        let mut errors = Vec::new();
        let mut compiled = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let regex = cache.entry(pattern.pattern().as_str()).or_insert_with(|| {
                match compile(pattern.pattern()) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        warn!(pattern = %pattern.pattern(), error = %e.message, "Skipping custom pattern");
                        errors.push(ConfigError::new(format!(
                            "custom {} pattern skipped: {}",
                            pattern.entity_type(),
                            e.message
                        )));
                        None
                    }
                }
            });
            if let Some(regex) = regex {
                compiled.push((pattern.clone(), regex.clone()));
            }
        }

        debug!(
            requested = patterns.len(),
            compiled = compiled.len(),
            "Compiled custom patterns"
        );
        (Self { patterns: compiled }, errors)
    }
}

impl LineRule for CustomPatternRule {
    fn name(&self) -> &'static str {
        "custom_pattern"
    }

    fn apply(&self, ctx: &LineContext<'_>) -> Option<Vec<Effect>> {
        let effects = self
            .patterns
            .iter()
            .filter_map(|(pattern, regex)| {
                let caps = regex.captures(ctx.line)?;
                let whole = caps.get(0)?;
                let name = caps.get(1).unwrap_or(whole).as_str().trim();
                if name.is_empty() || whole.as_str().trim().is_empty() {
                    return None;
                }
                let mut draft =
                    EntityDraft::new(*pattern.entity_type(), name, 0.8, whole.as_str().trim());
                if !pattern.label().is_empty() {
                    draft = draft.with_attribute("label", pattern.label().clone());
                }
                Some(Effect::Entity(draft))
            })
            .collect::<Vec<_>>();

        (!effects.is_empty()).then_some(effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::EntityType;

    #[test]
    fn test_bad_patterns_are_reported_once_and_skipped() {
        let patterns = vec![
            CustomPattern::new("(unclosed", EntityType::Faction, "guild"),
            CustomPattern::new("(unclosed", EntityType::Faction, "guild"),
            CustomPattern::new(r"House (\w+)", EntityType::Faction, "house"),
        ];

        let (rule, errors) = CustomPatternRule::compile(&patterns);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("custom faction pattern skipped"));
        assert_eq!(rule.patterns.len(), 1);
    }
}
