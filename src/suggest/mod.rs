/// Built-in phrase set every pool starts from.
pub const COMMON_SUGGESTIONS: [&str; 10] = [
    "Hello!",
    "How are you?",
    "Can you help me with...",
    "Thank you!",
    "Goodbye!",
    "Tell me about...",
    "Explain...",
    "What is...",
    "How does... work?",
    "Can you show me...",
];

#[derive(Clone, Copy, Debug)]
pub struct SuggestionOptions {
    pub max_suggestions: usize,
    pub min_length: usize,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            min_length: 2,
        }
    }
}

/// Autocomplete over the built-in phrases plus the user's own prior
/// messages, in insertion order. Matching is a plain case-insensitive
/// substring check; there is no scoring.
pub struct SuggestionEngine {
    options: SuggestionOptions,
    pool: Vec<String>,
}

impl SuggestionEngine {
    pub fn new(options: SuggestionOptions) -> Self {
        Self {
            options,
            pool: COMMON_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Appends a sent message to the pool.
    pub fn record(&mut self, content: &str) {
        self.pool.push(content.to_string());
    }

    /// Replace the user-message tail of the pool (e.g. after resuming a
    /// thread with existing history).
    pub fn reset_history(&mut self, contents: &[String]) {
        self.pool.truncate(COMMON_SUGGESTIONS.len());
        self.pool.extend(contents.iter().cloned());
    }

    pub fn suggest(&self, input: &str) -> Vec<String> {
        filter_suggestions(&self.pool, input, self.options)
    }
}

/// A candidate qualifies when the input is long enough, the candidate
/// contains the input case-insensitively, and the candidate is not the
/// input itself. First `max_suggestions` qualifiers win, in pool order.
pub fn filter_suggestions(
    pool: &[String],
    input: &str,
    options: SuggestionOptions
) -> Vec<String> {
    if input.chars().count() < options.min_length {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    pool.iter()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .filter(|candidate| candidate.to_lowercase() != needle)
        .take(options.max_suggestions)
        .cloned()
        .collect()
}

/// Canned follow-ups keyed off the last message in the conversation.
pub fn quick_replies(last_message: &str) -> Vec<&'static str> {
    const GREETINGS: [&str; 3] = ["hi", "hello", "hey"];
    const THANKS: [&str; 3] = ["thank", "thanks", "appreciate"];

    let lower = last_message.to_lowercase();

    if lower.contains('?') {
        return vec!["Yes", "No", "Maybe", "Can you explain more?", "I understand"];
    }
    if GREETINGS.iter().any(|g| lower.contains(g)) {
        return vec![
            "Can you help me with something?",
            "I have a question",
            "Tell me about your features"
        ];
    }
    if THANKS.iter().any(|t| lower.contains(t)) {
        return vec!["Goodbye!", "See you later!", "Thanks for your help!"];
    }

    vec!["Tell me more", "Can you explain?", "What else can you do?", "Thanks!"]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn substring_matches_qualify_case_insensitively() {
        let pool = pool(&["Hello!", "Thank you!", "foo bar"]);
        let out = filter_suggestions(&pool, "ello", SuggestionOptions::default());
        assert_eq!(out, vec!["Hello!".to_string()]);
    }

    #[test]
    fn input_below_min_length_yields_nothing() {
        let pool = pool(&["Hello!", "Thank you!"]);
        let out = filter_suggestions(&pool, "e", SuggestionOptions::default());
        assert!(out.is_empty());
    }

    #[test]
    fn the_exact_current_input_is_never_suggested() {
        let pool = pool(&["hello!", "Hello! How are you?"]);
        let out = filter_suggestions(&pool, "Hello!", SuggestionOptions::default());
        assert_eq!(out, vec!["Hello! How are you?".to_string()]);
    }

    #[test]
    fn results_never_exceed_the_cap() {
        let pool = pool(&["aa 1", "aa 2", "aa 3", "aa 4", "aa 5", "aa 6", "aa 7"]);
        let options = SuggestionOptions {
            max_suggestions: 5,
            min_length: 2,
        };
        let out = filter_suggestions(&pool, "aa", options);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], "aa 1");
        assert_eq!(out[4], "aa 5");
    }

    #[test]
    fn pool_order_is_preserved_with_recorded_messages_last() {
        let mut engine = SuggestionEngine::new(SuggestionOptions::default());
        engine.record("tell me a joke");
        let out = engine.suggest("tell");
        assert_eq!(
            out,
            vec!["Tell me about...".to_string(), "tell me a joke".to_string()]
        );
    }

    #[test]
    fn reset_history_drops_previous_session_messages() {
        let mut engine = SuggestionEngine::new(SuggestionOptions::default());
        engine.record("old session line");
        engine.reset_history(&["new session line".to_string()]);
        assert!(engine.suggest("old session").is_empty());
        assert_eq!(engine.suggest("new session"), vec!["new session line".to_string()]);
    }

    #[test]
    fn quick_replies_follow_the_message_category() {
        assert!(quick_replies("What would you like?").contains(&"Yes"));
        assert!(quick_replies("hello there").contains(&"I have a question"));
        assert!(quick_replies("thanks a lot").contains(&"Goodbye!"));
        assert!(quick_replies("the weather is fine").contains(&"Tell me more"));
    }
}
