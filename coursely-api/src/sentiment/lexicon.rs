//! Fixed word lists for the lexicon scorer
//!
//! Vocabulary is tuned to course reviews. Lists are disjoint: a word is a
//! sentiment word, a negator, or an intensifier, never more than one.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Words contributing +1 to the polarity score
pub static POSITIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good",
        "great",
        "excellent",
        "amazing",
        "awesome",
        "fantastic",
        "wonderful",
        "helpful",
        "clear",
        "engaging",
        "interesting",
        "useful",
        "informative",
        "practical",
        "thorough",
        "organized",
        "enjoyable",
        "fun",
        "recommend",
        "recommended",
        "love",
        "loved",
        "like",
        "liked",
        "best",
        "perfect",
        "insightful",
        "valuable",
        "easy",
        "effective",
        "supportive",
        "knowledgeable",
        "patient",
        "inspiring",
        "brilliant",
        "outstanding",
        "superb",
        "solid",
        "rewarding",
        "approachable",
        "responsive",
    ]
    .into_iter()
    .collect()
});

/// Words contributing -1 to the polarity score
pub static NEGATIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad",
        "poor",
        "terrible",
        "awful",
        "horrible",
        "boring",
        "confusing",
        "useless",
        "unclear",
        "disorganized",
        "disappointing",
        "disappointed",
        "waste",
        "difficult",
        "hate",
        "hated",
        "dislike",
        "disliked",
        "worst",
        "outdated",
        "slow",
        "dry",
        "tedious",
        "frustrating",
        "rushed",
        "shallow",
        "vague",
        "dull",
        "mediocre",
        "incomplete",
        "unhelpful",
        "broken",
        "messy",
        "overpriced",
    ]
    .into_iter()
    .collect()
});

/// Words that flip the sign of the following sentiment word
pub static NEGATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not",
        "no",
        "never",
        "neither",
        "nor",
        "cannot",
        "can't",
        "don't",
        "doesn't",
        "didn't",
        "isn't",
        "wasn't",
        "aren't",
        "weren't",
        "won't",
        "wouldn't",
        "couldn't",
        "shouldn't",
        "hardly",
        "barely",
        "without",
    ]
    .into_iter()
    .collect()
});

/// Words that double the contribution of the following sentiment word
pub static INTENSIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "very",
        "really",
        "extremely",
        "incredibly",
        "absolutely",
        "totally",
        "highly",
        "so",
        "super",
        "truly",
        "especially",
        "particularly",
    ]
    .into_iter()
    .collect()
});
