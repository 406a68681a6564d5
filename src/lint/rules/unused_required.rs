//! Unused Required value detection.

use std::collections::BTreeSet;

use crate::config::{referenced_keys, Config};
use crate::lint::{LintDiagnostic, LintRule, RuleId, Severity};

/// Reports Required values no template ever reads.
pub struct UnusedRequiredRule;

impl LintRule for UnusedRequiredRule {
    fn id(&self) -> RuleId {
        RuleId::new("unused-required")
    }

    fn name(&self) -> &str {
        "Unused Required"
    }

    fn default_severity(&self) -> Severity {
        Severity::Hint
    }

    fn check(&self, config: &Config) -> Vec<LintDiagnostic> {
        let used: BTreeSet<String> = config
            .create_vars
            .iter()
            .map(|v| v.value.clone())
            .chain(config.steps().iter().flat_map(|s| s.templates()))
            .flat_map(|t| referenced_keys(&t))
            .collect();

        config
            .required
            .iter()
            .filter(|r| !used.contains(&r.name))
            .map(|r| {
                LintDiagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!("Required value '{}' is never used", r.name),
                )
            })
            .collect()
    }
}
