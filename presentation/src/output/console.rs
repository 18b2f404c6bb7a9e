//! Console output formatter for consensus results

use colored::Colorize;
use consensus_domain::{ConsensusLevel, FinalPayload, ProviderId, RawAnswer};

/// Formats consensus results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result: verdict, claims, conflicts and raw answers
    pub fn format(question: &str, payload: &FinalPayload) -> String {
        let verdict = &payload.verdict;
        let mut output = String::new();

        output.push_str(&Self::header("LLM Consensus"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Question:".cyan().bold(), question));
        output.push_str(&format!(
            "{} {}\n\n",
            "Providers:".cyan().bold(),
            payload
                .raw_answers
                .iter()
                .map(|(p, _)| p.display_name())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        output.push_str(&Self::section_header("Verdict"));
        output.push_str(&format!(
            "\n{} {}\n",
            "Score:".bold(),
            Self::score_line(verdict.consensus_score, verdict.consensus_level)
        ));
        output.push_str(&format!(
            "{} {}\n\n{}\n",
            "Judge:".bold(),
            payload.judge.display_name(),
            verdict.summary
        ));

        if !verdict.claims.is_empty() {
            output.push_str(&Self::section_header("Claims"));
            for claim in &verdict.claims {
                let marker = if claim.is_disputed() {
                    "!".yellow().bold()
                } else {
                    "*".green().bold()
                };
                output.push_str(&format!("\n{} {}\n", marker, claim.text));
                output.push_str(&format!(
                    "    {} {}\n",
                    "supported by:".dimmed(),
                    Self::names(&claim.supporters)
                ));
                if claim.is_disputed() {
                    output.push_str(&format!(
                        "    {} {}\n",
                        "disputed by:".dimmed(),
                        Self::names(&claim.dissenters)
                    ));
                }
                if let Some(warning) = &claim.warning {
                    output.push_str(&format!("    {} {}\n", "warning:".yellow(), warning));
                }
            }
        }

        if !verdict.conflicts().is_empty() {
            output.push_str(&Self::section_header("Conflicts"));
            for conflict in verdict.conflicts() {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    conflict.topic.yellow().bold(),
                    Self::indent(&conflict.description, "  ")
                ));
            }
        }

        output.push_str(&Self::section_header("Raw Answers"));
        for (provider, answer) in payload.raw_answers.iter() {
            match answer {
                RawAnswer::Text(text) => output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", provider.display_name()).yellow().bold(),
                    text
                )),
                RawAnswer::Unavailable => output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", provider.display_name()).red().bold(),
                    answer.as_str().dimmed()
                )),
            }
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(payload: &FinalPayload) -> String {
        serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format score and summary only (concise output)
    pub fn format_summary(question: &str, payload: &FinalPayload) -> String {
        let verdict = &payload.verdict;
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== LLM Consensus ===".cyan().bold()));
        output.push_str(&format!("{} {}\n\n", "Q:".bold(), question));
        output.push_str(&format!(
            "{} {}\n\n",
            "Consensus:".dimmed(),
            Self::score_line(verdict.consensus_score, verdict.consensus_level)
        ));
        output.push_str(&verdict.summary);
        output.push('\n');

        output
    }

    fn score_line(score: u8, level: ConsensusLevel) -> String {
        let label = format!("{score}/100 ({level})");
        match level {
            ConsensusLevel::High => label.green().bold().to_string(),
            ConsensusLevel::Medium => label.yellow().bold().to_string(),
            ConsensusLevel::Low => label.red().bold().to_string(),
        }
    }

    fn names(providers: &[ProviderId]) -> String {
        if providers.is_empty() {
            return "-".to_string();
        }
        providers
            .iter()
            .map(|p| p.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
