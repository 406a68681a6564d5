//! Built-in lint rules.

mod template_syntax;
mod undefined_key;
mod unused_required;

pub use template_syntax::TemplateSyntaxRule;
pub use undefined_key::UndefinedKeyRule;
pub use unused_required::UnusedRequiredRule;
