//! Curated vocabularies for headline classification.
//!
//! The override sets are checked as whole-word matches and win over the
//! polarity score. Membership is tunable; the precedence is not.

/// Strong positive signals; any hit classifies the headline Positive.
pub const POSITIVE_WORDS: &[&str] = &[
    "profit",
    "growth",
    "success",
    "win",
    "record",
    "innovation",
    "strong",
    "rise",
    "optimistic",
    "gains",
    "increase",
    "improve",
    "advancement",
    "stunner",
    "comeback",
    "clutch",
    "dominant",
    "amazing",
    "upset",
    "stable",
    "good",
    "fix",
    "new",
];

/// Strong negative signals; checked after the positive set.
pub const NEGATIVE_WORDS: &[&str] = &[
    "crash",
    "decline",
    "loss",
    "fail",
    "drop",
    "problem",
    "risk",
    "cut",
    "pessimistic",
    "downturn",
    "plummet",
    "reduce",
    "collapse",
    "hopeless",
    "fatal",
    "suing",
];

/// Weighted polarity words for the fallback score, range [-1, 1] each.
/// Mostly evaluative adjectives and verbs; the score for a headline is the
/// mean weight of the matched words.
pub const POLARITY_WORDS: &[(&str, f64)] = &[
    ("excellent", 1.0),
    ("best", 1.0),
    ("great", 0.8),
    ("happy", 0.8),
    ("beautiful", 0.85),
    ("remarkable", 0.75),
    ("breakthrough", 0.7),
    ("thriving", 0.7),
    ("promising", 0.6),
    ("positive", 0.6),
    ("celebrates", 0.6),
    ("soars", 0.6),
    ("praised", 0.6),
    ("better", 0.5),
    ("safe", 0.5),
    ("popular", 0.4),
    ("hopeful", 0.4),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("deadly", -0.9),
    ("bad", -0.7),
    ("dire", -0.7),
    ("negative", -0.6),
    ("grim", -0.6),
    ("dangerous", -0.6),
    ("worse", -0.6),
    ("slump", -0.6),
    ("threat", -0.6),
    ("sad", -0.5),
    ("weak", -0.5),
    ("struggles", -0.5),
    ("fears", -0.5),
    ("poor", -0.4),
    ("warning", -0.4),
];
