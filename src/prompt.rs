//! Prompt assembly.
//!
//! Pure templating: retrieved context and the user's question are spliced
//! into a fixed QA template. Context passes through verbatim — size limits
//! belong to the generation side, not here.

/// System turn used to open every conversation.
pub const SYSTEM_PROMPT: &str = "You are a multilingual question answering assistant.";

/// QA template. `{context}` and `{query}` are filled by [`assemble`].
pub const ANSWER_TEMPLATE: &str = "\
Your task is to answer the user's question based on the context provided.

# Rules:
- If the answer is a single character (e.g. \"ক\", \"খ\", \"গ\"), it is a multiple-choice answer; look it up in the context.
- Respond in the language of the user, as briefly as possible.
- Do not mention the context unless the user asks about it.
- If the context is blank, respond with \"Not in my knowledge base\".

Here is some context:
{context}

Based on this, answer the user's question:
{query}
";

/// Fill the template. The query is substituted first so the context is never
/// re-scanned for placeholders.
pub fn assemble(context: &str, query: &str) -> String {
    ANSWER_TEMPLATE
        .replace("{query}", query)
        .replace("{context}", context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_passes_through_verbatim() {
        let context = "প্রথম অংশ\nদ্বিতীয় অংশ\n  whitespace   kept  ";
        let prompt = assemble(context, "প্রশ্ন?");
        assert!(prompt.contains(context));
        assert!(prompt.contains("প্রশ্ন?"));
    }

    #[test]
    fn blank_context_leaves_template_intact() {
        let prompt = assemble("", "প্রশ্ন?");
        assert!(prompt.contains("Here is some context:\n\n"));
        assert!(prompt.contains("Not in my knowledge base"));
    }

    #[test]
    fn no_placeholders_survive() {
        let prompt = assemble("ctx", "q");
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{query}"));
    }
}
