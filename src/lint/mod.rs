//! Configuration linting.
//!
//! Validation in [`crate::config`] rejects configs that cannot run. Lint
//! rules look at a config that loaded and report what would fail or
//! surprise once it runs:
//!
//! - **Rules** - Individual checks ([`LintRule`] trait)
//! - **Registry** - Collection of all available rules ([`RuleRegistry`])
//! - **Diagnostics** - Issue reports with severity and suggestions ([`LintDiagnostic`])
//!
//! [`SchemaGenerator`] produces the JSON Schema printed by `seqrun schema`.

pub mod diagnostic;
pub mod registry;
pub mod rule;
pub mod rules;
pub mod schema;

pub use diagnostic::LintDiagnostic;
pub use registry::RuleRegistry;
pub use rule::{LintRule, RuleId, Severity};
pub use rules::{TemplateSyntaxRule, UndefinedKeyRule, UnusedRequiredRule};
pub use schema::SchemaGenerator;
