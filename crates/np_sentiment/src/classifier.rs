use np_core::Sentiment;

use crate::lexicon::{NEGATIVE_WORDS, POLARITY_WORDS, POSITIVE_WORDS};

/// Classify a headline. `None` means the title is empty and the record
/// should be left untouched.
///
/// Precedence: positive keyword hit, then negative keyword hit, then the
/// polarity score. Sports headlines lean Positive in the polarity branch.
pub fn classify(title: &str, category: &str) -> Option<Sentiment> {
    let words = tokenize(title);
    if words.is_empty() {
        return None;
    }

    if words.iter().any(|w| POSITIVE_WORDS.contains(&w.as_str())) {
        return Some(Sentiment::Positive);
    }
    if words.iter().any(|w| NEGATIVE_WORDS.contains(&w.as_str())) {
        return Some(Sentiment::Negative);
    }

    let is_sports = category.eq_ignore_ascii_case("sports");
    Some(from_polarity(polarity_of_words(&words), is_sports))
}

/// Lexicon polarity of a text, in [-1, 1]; 0.0 when nothing matches.
pub fn polarity(text: &str) -> f64 {
    polarity_of_words(&tokenize(text))
}

fn polarity_of_words(words: &[String]) -> f64 {
    let weights: Vec<f64> = words
        .iter()
        .filter_map(|w| {
            POLARITY_WORDS
                .iter()
                .find(|(word, _)| *word == w.as_str())
                .map(|(_, weight)| *weight)
        })
        .collect();
    if weights.is_empty() {
        return 0.0;
    }
    weights.iter().sum::<f64>() / weights.len() as f64
}

pub(crate) fn from_polarity(polarity: f64, is_sports: bool) -> Sentiment {
    if polarity > 0.05 || (is_sports && polarity >= 0.0) {
        Sentiment::Positive
    } else if polarity < -0.05 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_wins_over_polarity() {
        // "stunner" is a positive keyword even though "loss" is negative
        assert_eq!(
            classify("stunner loss for the team", "Sports"),
            Some(Sentiment::Positive)
        );
    }

    #[test]
    fn negative_keyword_applies_after_positive() {
        assert_eq!(
            classify("Markets crash on rate fears", "Business"),
            Some(Sentiment::Negative)
        );
        // Positive set is checked first when both match
        assert_eq!(
            classify("Record loss narrows for carmaker", "Business"),
            Some(Sentiment::Positive)
        );
    }

    #[test]
    fn sports_bias_applies_only_without_keywords() {
        // "wins" is not a whole-word keyword hit and carries no polarity
        assert_eq!(
            classify("Local team wins quietly", "Sports"),
            Some(Sentiment::Positive)
        );
        assert_eq!(
            classify("Local team wins quietly", "General"),
            Some(Sentiment::Neutral)
        );
    }

    #[test]
    fn sports_bias_does_not_rescue_negative_polarity() {
        assert_eq!(from_polarity(-0.2, true), Sentiment::Negative);
        assert_eq!(from_polarity(-0.03, true), Sentiment::Neutral);
        assert_eq!(from_polarity(0.0, true), Sentiment::Positive);
    }

    #[test]
    fn polarity_threshold_is_strict() {
        assert_eq!(from_polarity(0.05, false), Sentiment::Neutral);
        assert_eq!(from_polarity(0.06, false), Sentiment::Positive);
        assert_eq!(from_polarity(-0.05, false), Sentiment::Neutral);
        assert_eq!(from_polarity(-0.06, false), Sentiment::Negative);
    }

    #[test]
    fn polarity_falls_back_when_no_keywords_match() {
        assert_eq!(
            classify("A grim outlook for commuters", "General"),
            Some(Sentiment::Negative)
        );
        assert_eq!(
            classify("Remarkable results for local hospital", "Health"),
            Some(Sentiment::Positive)
        );
    }

    #[test]
    fn empty_title_is_skipped() {
        assert_eq!(classify("", "General"), None);
        assert_eq!(classify("   ", "Sports"), None);
    }

    #[test]
    fn polarity_averages_matched_words() {
        assert_eq!(polarity("nothing matches here"), 0.0);
        let score = polarity("best and worst of the week");
        assert!(score.abs() < f64::EPSILON);
        assert!(polarity("a great day") > 0.5);
    }

    #[test]
    fn tokenizer_strips_punctuation() {
        assert_eq!(
            classify("Quarterly profit, at last.", "Business"),
            Some(Sentiment::Positive)
        );
    }
}
