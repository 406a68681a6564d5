//! Rule registry for managing lint rules.

use super::diagnostic::LintDiagnostic;
use super::rule::{LintRule, RuleId};
use super::rules::{TemplateSyntaxRule, UndefinedKeyRule, UnusedRequiredRule};
use crate::config::Config;

/// Registry of lint rules, run in registration order.
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a registry with all built-in rules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TemplateSyntaxRule));
        registry.register(Box::new(UndefinedKeyRule));
        registry.register(Box::new(UnusedRequiredRule));
        registry
    }

    /// Register a lint rule, replacing any rule with the same id.
    pub fn register(&mut self, rule: Box<dyn LintRule>) {
        let id = rule.id();
        self.rules.retain(|r| r.id() != id);
        self.rules.push(rule);
    }

    /// Get a rule by ID.
    pub fn get(&self, id: &RuleId) -> Option<&dyn LintRule> {
        self.rules.iter().find(|r| &r.id() == id).map(|r| r.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule, most severe diagnostics first.
    pub fn check(&self, config: &Config) -> Vec<LintDiagnostic> {
        let mut diagnostics: Vec<_> = self.iter().flat_map(|r| r.check(config)).collect();
        diagnostics.sort_by(|a, b| b.severity.cmp(&a.severity));
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = RuleRegistry::with_builtins();
        assert_eq!(registry.len(), 3);
        assert!(registry.get(&RuleId::new("undefined-key")).is_some());
        assert!(registry.get(&RuleId::new("nonexistent")).is_none());
    }

    #[test]
    fn register_replaces_same_id() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(UndefinedKeyRule));
        registry.register(Box::new(UndefinedKeyRule));
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }
}
