//! Prompt templates for the consensus flow

use crate::orchestration::value_objects::RoundResult;
use crate::verdict::ConsensusBanding;

/// Marker shown to the judge in place of a missing answer
pub const UNAVAILABLE_MARKER: &str = "[UNAVAILABLE: this provider did not respond]";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System instruction for every provider answering the user's question
    pub fn answer_system() -> &'static str {
        r#"You are a knowledgeable expert answering a user's question.
Give an accurate, well-reasoned answer. Be concise but complete.
State uncertainty explicitly instead of guessing."#
    }

    /// System instruction for the judge
    pub fn synthesis_system() -> &'static str {
        r#"You are an impartial judge cross-referencing answers from several independent AI providers.
You never add facts of your own. You only compare, attribute and summarize what the providers said.
You respond with a single JSON object and nothing else."#
    }

    /// Instruction asking the judge to compare the raw answers and emit a verdict
    pub fn synthesis_prompt(
        question: &str,
        round: &RoundResult,
        banding: &ConsensusBanding,
    ) -> String {
        let mut prompt = format!(
            r#"Original question: {}

Provider answers:
"#,
            question
        );

        for (provider, outcome) in round.iter() {
            let body = outcome.as_text().unwrap_or(UNAVAILABLE_MARKER);
            prompt.push_str(&format!("\n--- {} ---\n{}\n", provider.as_str(), body));
        }

        let responders = round
            .responders()
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        prompt.push_str(&format!(
            r#"
Tasks:
1. Identify the claims that all responding providers agree on.
2. Identify direct contradictions between providers and list them as conflicts (topic and description).
3. Write a synthesized answer to the question as `summary`, then decompose it into discrete, atomic claims.
4. For every claim, list the providers that support it in `supporters` and the providers that contradict it in `dissenters`.
   Only these provider ids may appear: {responders}. Never attribute anything to an unavailable provider.
   A provider appears at most once per claim and never in both lists.
5. Add a short `warning` to a claim only when it has at least one dissenter.
6. Rate agreement between the providers as `consensus_score`, an integer from 0 (total disagreement) to 100 (complete agreement).
7. Set `consensus_level` from the score: {bands}.

Respond with JSON only. Omit `conflicts` or set it to null when there are none."#,
            responders = responders,
            bands = banding.description()
        ));

        prompt
    }
}
