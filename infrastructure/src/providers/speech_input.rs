//! Text preparation for speech synthesis

use regex::Regex;
use std::sync::LazyLock;

/// Longest input sent to the speech endpoint, in characters
pub const MAX_SPEECH_CHARS: usize = 1000;

/// Average speaking rate used to estimate clip length
const WORDS_PER_SECOND: f64 = 2.5;

/// A short `Name:` label at the very start of the text
static SPEAKER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[^:\n.!?]{1,40}:\s+").expect("static regex"));

/// Drop a leading speaker label, collapse whitespace and cut at
/// [`MAX_SPEECH_CHARS`], preferring a sentence boundary.
pub fn prepare_input(text: &str) -> String {
    let unlabelled = SPEAKER_LABEL.replace(text, "");
    let collapsed = unlabelled.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_SPEECH_CHARS {
        return collapsed;
    }

    let cut: String = collapsed.chars().take(MAX_SPEECH_CHARS).collect();
    match cut.rfind(['.', '!', '?']) {
        Some(end) if end > MAX_SPEECH_CHARS / 2 => cut[..=end].to_string(),
        _ => cut,
    }
}

/// Voice id as the endpoint expects it
pub fn voice_id(model: &str, voice: &str, qualify: bool) -> String {
    if qualify && !voice.contains(':') {
        format!("{}:{}", model, voice)
    } else {
        voice.to_string()
    }
}

/// Estimated length of `text` read aloud
pub fn estimate_duration_secs(text: &str) -> f64 {
    let words = text.split_whitespace().count() as f64;
    (words / WORDS_PER_SECOND).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_only_collapsed() {
        assert_eq!(prepare_input("  Hello\n\nthere   world "), "Hello there world");
    }

    #[test]
    fn test_speaker_label_is_dropped() {
        assert_eq!(prepare_input("Economist: Prices matter."), "Prices matter.");
        assert_eq!(
            prepare_input("Prices matter. Note: a lot."),
            "Prices matter. Note: a lot."
        );
    }

    #[test]
    fn test_long_text_is_cut_at_sentence() {
        let sentence = "Carbon pricing works when revenue is returned. ";
        let text = sentence.repeat(40);
        let prepared = prepare_input(&text);
        assert!(prepared.chars().count() <= MAX_SPEECH_CHARS);
        assert!(prepared.ends_with('.'));
    }

    #[test]
    fn test_long_text_without_punctuation_is_hard_cut() {
        let text = "word ".repeat(400);
        let prepared = prepare_input(&text);
        assert_eq!(prepared.chars().count(), MAX_SPEECH_CHARS);
    }

    #[test]
    fn test_voice_id() {
        assert_eq!(
            voice_id("FunAudioLLM/CosyVoice2-0.5B", "alex", true),
            "FunAudioLLM/CosyVoice2-0.5B:alex"
        );
        assert_eq!(voice_id("m", "alex", false), "alex");
        assert_eq!(voice_id("m", "other:anna", true), "other:anna");
    }

    #[test]
    fn test_duration_estimate() {
        assert_eq!(estimate_duration_secs("one two three four five"), 2.0);
        assert_eq!(estimate_duration_secs(""), 1.0);
    }
}
