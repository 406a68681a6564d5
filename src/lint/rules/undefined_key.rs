//! Undefined template key detection.
//!
//! A key is defined for a step when a Required value, the CreateVars block,
//! or an earlier step's output provides it.

use std::collections::BTreeSet;

use crate::config::{referenced_keys, Config};
use crate::lint::{LintDiagnostic, LintRule, RuleId, Severity};

/// Reports template references to keys nothing provides before the step runs.
pub struct UndefinedKeyRule;

impl LintRule for UndefinedKeyRule {
    fn id(&self) -> RuleId {
        RuleId::new("undefined-key")
    }

    fn name(&self) -> &str {
        "Undefined Key"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, config: &Config) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();
        let mut provided: BTreeSet<String> = config
            .required
            .iter()
            .map(|r| r.name.clone())
            .chain(config.create_vars.iter().map(|v| v.key.clone()))
            .collect();

        for step in config.steps() {
            let missing: BTreeSet<String> = step
                .templates()
                .iter()
                .flat_map(|t| referenced_keys(t))
                .filter(|k| !provided.contains(k))
                .collect();

            for key in missing {
                diagnostics.push(
                    LintDiagnostic::new(
                        self.id(),
                        self.default_severity(),
                        format!(
                            "Step '{}' references {{{{ .{} }}}} but nothing provides it",
                            step.name(),
                            key
                        ),
                    )
                    .with_step(step.name())
                    .with_suggestion(format!(
                        "Declare '{}' under Required, or set it with a CreateVar or ValueKey before this step",
                        key
                    )),
                );
            }

            if let Some(key) = step.output_key() {
                provided.insert(key.to_string());
            }
        }

        diagnostics
    }
}
