//! Prompt text for the advisor: the system instruction and the
//! "Generate Routine" request.

use crate::catalog::Product;

/// First message of every conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful beauty product and routine advisor. \
When presenting routines or step-by-step instructions, always label steps as 'Step 1:', 'Step 2:', etc. \
Do NOT use asterisks (*), Markdown emphasis, or other markup; return plain, easy-to-read text. \
Keep explanations concise and include cautions where relevant.";

/// Transcript text shown in place of the full routine prompt.
pub const ROUTINE_DISPLAY_TEXT: &str = "Please generate a personalized routine using the selected products.";

const CLARIFYING_PROMPT: &str = "I would like a personalized routine, but I haven't selected any products yet. \
Please ask me follow-up questions to learn my skin/hair type, concerns, allergies, and whether I want an AM or PM routine, \
so you can recommend products and a step-by-step routine. \
IMPORTANT: When you ask questions or provide an eventual routine, label steps as 'Step 1:', 'Step 2:', etc., \
and do not use any asterisks (*) or Markdown formatting; use plain text only.";

const ROUTINE_PROMPT_HEADER: &str = "Please create a clear, step-by-step personalized routine using only the selected products below. \
For each step, include the product name, when to use it (AM/PM), order, short rationale, clear step by step answers, and any cautions \
(e.g., avoid retinol with certain actives). Keep it friendly and concise. \
IMPORTANT: Label each step exactly as 'Step 1:', 'Step 2:', etc. \
Do NOT use asterisks (*) or Markdown formatting; return plain text only.";

/// A routine turn: what the transcript shows and what goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineRequest {
    pub display: String,
    pub prompt: String,
}

impl RoutineRequest {
    /// Build the request for `products`. With no products the assistant is
    /// asked to gather details first; the transcript then shows the prompt
    /// itself.
    #[must_use]
    pub fn for_products(products: &[&Product]) -> Self {
        if products.is_empty() {
            return Self { display: CLARIFYING_PROMPT.to_string(), prompt: CLARIFYING_PROMPT.to_string() };
        }
        let prompt = format!("{ROUTINE_PROMPT_HEADER}\n\nSelected products:\n{}", product_summaries(products));
        Self { display: ROUTINE_DISPLAY_TEXT.to_string(), prompt }
    }

    /// True when this request asks clarifying questions rather than a routine.
    #[must_use]
    pub fn is_clarifying(&self) -> bool {
        self.prompt == CLARIFYING_PROMPT
    }
}

fn product_summaries(products: &[&Product]) -> String {
    products
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {} - {} ({})\n   {}", i + 1, p.brand, p.name, p.category, p.description))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
#[path = "routine_test.rs"]
mod tests;
