//! Prompt templates for debate turns

use crate::context::assembler::TurnContext;
use serde::{Deserialize, Serialize};

/// Model input for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebatePrompt {
    pub system: String,
    pub user: String,
}

/// Templates for generating debate prompts
pub struct DebatePromptTemplate;

impl DebatePromptTemplate {
    /// System prompt: persona, opponents, topic and ground rules
    pub fn system(context: &TurnContext) -> String {
        let persona = &context.persona;
        let opponents = if persona.opponents.is_empty() {
            "the other participants".to_string()
        } else {
            persona.opponents.join(", ")
        };

        format!(
            r#"You are {name}, {title}.
{persona}

You are in a heated debate with {opponents} on the topic: "{topic}".

Ground rules:
1. Hold your position; do not concede to the others lightly.
2. Speak from your own expertise and perspective.
3. Rebut the strongest opposing point made so far with evidence or reasoning.
4. Bring new arguments instead of repeating earlier ones.
5. Stay professional but passionate."#,
            name = persona.name,
            title = persona.title,
            persona = persona.persona,
            opponents = opponents,
            topic = context.topic,
        )
    }

    /// User prompt: history window, supporting material and instructions
    pub fn user(context: &TurnContext) -> String {
        let mut prompt = format!("Round {} of {}.\n\n", context.round, context.max_rounds);

        prompt.push_str("Debate so far:\n");
        if context.is_opening() {
            prompt.push_str(
                "This is the start of the debate and you speak first. \
                 State your core position directly.\n",
            );
        } else {
            for line in &context.history {
                if line.failed {
                    prompt.push_str(&format!(
                        "[Round {}] {}: (no response)\n",
                        line.round, line.speaker
                    ));
                } else {
                    prompt.push_str(&format!(
                        "[Round {}] {}: {}\n",
                        line.round, line.speaker, line.content
                    ));
                }
            }
        }

        if let Some(material) = context.retrieval.prompt_text() {
            prompt.push_str("\nSupporting material for your position:\n");
            prompt.push_str(material);
            prompt.push('\n');
        }

        prompt.push_str(
            r#"
Reply requirements:
- Two or three forceful sentences.
- Do not unpack every argument at once; leave room for later rounds.
- Cite facts, data or cases where you can.
- Reply with the content only, without prefixing your name."#,
        );

        if context.is_final_round() {
            prompt.push_str("\n- This is the final round: close with your strongest argument.");
        }

        prompt
    }

    pub fn render(context: &TurnContext) -> DebatePrompt {
        DebatePrompt {
            system: Self::system(context),
            user: Self::user(context),
        }
    }
}
