//! Template syntax validation.

use crate::config::{parse_template, Config};
use crate::lint::{LintDiagnostic, LintRule, RuleId, Severity};

/// Reports templates that will fail to parse when their step runs.
pub struct TemplateSyntaxRule;

impl LintRule for TemplateSyntaxRule {
    fn id(&self) -> RuleId {
        RuleId::new("template-syntax")
    }

    fn name(&self) -> &str {
        "Template Syntax"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, config: &Config) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();

        for step in config.steps() {
            for template in step.templates() {
                if let Err(e) = parse_template(&template) {
                    diagnostics.push(
                        LintDiagnostic::new(
                            self.id(),
                            self.default_severity(),
                            format!("Step '{}': {}", step.name(), e),
                        )
                        .with_step(step.name()),
                    );
                }
            }
        }

        diagnostics
    }
}
