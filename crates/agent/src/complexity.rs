//! Heuristic detection of campaign-level planning questions.
//!
//! Multi-constraint or long-horizon requests get a temporary planning
//! instruction injected into the request so the model answers with a
//! phased plan instead of a one-liner. The heuristic only shapes the
//! prompt; a false positive costs nothing but verbosity.

/// Phrases that signal a long-horizon or multi-constraint request.
const COMPLEX_SIGNALS: &[&str] = &[
    "long-term",
    "long term",
    "mid game",
    "late game",
    "campaign",
    "roadmap",
    "plan",
    "trade-off",
    "tradeoff",
    "optimize",
    "contingency",
    "fallback",
    "if ",
    "risk",
    "timeline",
    "5 year",
    "10 year",
    "15 year",
    "30 year",
];

/// Conjunctions that join independent constraints.
const SEPARATOR_WORDS: &[&str] = &["and", "while", "versus", "vs", "with"];

/// Identify multi-constraint or long-horizon requests.
pub fn is_complex_query(user_message: &str) -> bool {
    let lower = user_message.to_lowercase();

    let signal_count = COMPLEX_SIGNALS.iter().filter(|s| lower.contains(*s)).count();

    let separators = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| SEPARATOR_WORDS.contains(w))
        .count();

    let punctuation_split = lower.matches(',').count() + lower.matches(';').count();
    let long_message = lower.split_whitespace().count() >= 20;

    signal_count >= 2 || separators >= 2 || punctuation_split >= 2 || long_message
}

/// Runtime instruction injected as a temporary system message.
pub fn planning_instruction() -> &'static str {
    "[Complex Query Mode Enabled]\n\
     Treat this as a campaign-level planning question. \
     If critical context is missing, ask up to 3 clarifying questions first. \
     Otherwise respond with: Situation Snapshot, Objectives (Short/Mid/Long), \
     Phased Plan (Immediate/5-year/10+ year), Risk Matrix, Pivot Triggers, \
     and First 3 Actions. Include conservative and aggressive alternatives."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_question_is_not_complex() {
        assert!(!is_complex_query("What does inflation do?"));
        assert!(!is_complex_query("How do I recruit mercenaries?"));
    }

    #[test]
    fn multiple_signals_are_complex() {
        assert!(is_complex_query(
            "Give me a long-term campaign roadmap for England"
        ));
    }

    #[test]
    fn multiple_separators_are_complex() {
        assert!(is_complex_query(
            "Expand trade while fighting France and keeping Scotland friendly"
        ));
    }

    #[test]
    fn heavy_punctuation_is_complex() {
        assert!(is_complex_query(
            "Fix my economy, raise an army, keep estates happy"
        ));
    }

    #[test]
    fn long_message_is_complex() {
        let msg = "I am playing England in 1337 and I would like to know \
                   what the best opening strategy is for the first decade of my game";
        assert!(is_complex_query(msg));
    }

    #[test]
    fn separator_matching_is_word_bounded() {
        // "sandwich" contains "and" and "with" as substrings only.
        assert!(!is_complex_query("best sandwich province"));
    }
}
