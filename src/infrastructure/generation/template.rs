//! Template-based response generator

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::generation::{GenerationContext, ResponseGenerator};

/// Maximum characters quoted from a single knowledge hit
const SNIPPET_CHARS: usize = 200;

/// Composes a reply from the message, the prior turn and knowledge hits
///
/// Used when no model-backed generator is wired in. An `agentConfig.name`
/// string, when present, prefixes the reply.
#[derive(Debug, Clone, Default)]
pub struct TemplateResponseGenerator;

impl TemplateResponseGenerator {
    pub fn new() -> Self {
        Self
    }

    fn snippet(text: &str) -> String {
        if text.chars().count() <= SNIPPET_CHARS {
            text.to_string()
        } else {
            let truncated: String = text.chars().take(SNIPPET_CHARS).collect();
            format!("{}...", truncated)
        }
    }
}

#[async_trait]
impl ResponseGenerator for TemplateResponseGenerator {
    async fn generate(&self, context: &GenerationContext) -> Result<String, DomainError> {
        let mut lines = Vec::new();

        if let Some(name) = context.agent_config.get("name").and_then(|v| v.as_str()) {
            lines.push(format!("[{}]", name));
        }

        if let Some(prior) = &context.prior_turn {
            lines.push(format!(
                "Continuing from your previous message: \"{}\"",
                prior.last_message
            ));
        }

        lines.push(format!("Received: {}", context.message));

        if !context.knowledge.is_empty() {
            lines.push("Relevant knowledge:".to_string());
            lines.extend(
                context
                    .knowledge
                    .iter()
                    .map(|hit| format!("- {} (score {:.2})", Self::snippet(&hit.content), hit.score)),
            );
        }

        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "template"
    }
}
