//! Lexicon-based sentiment scoring
//!
//! Maps free text to a signed integer polarity score. Each word found in the
//! positive/negative lexicon contributes +1/-1, adjusted by the chain of
//! modifier words immediately before it: every negator flips the sign, every
//! intensifier doubles the contribution. "not good" scores -1, "very good"
//! scores +2, "not very good" scores -2.
//!
//! Scoring is a pure function of the input text: no configuration, no I/O,
//! deterministic. Empty or whitespace-only text scores 0.
//!
//! The scorer sits behind the [`TextScorer`] trait so the aggregation engine
//! and submission workflow never depend on the lexicon directly; a different
//! model can be swapped in without touching either.

pub mod lexicon;

/// Polarity scoring capability used by the submission workflow
pub trait TextScorer: Send + Sync {
    /// Score a comment; positive result means positive sentiment
    fn score(&self, text: &str) -> i64;
}

/// The fixed-lexicon scorer used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl TextScorer for LexiconScorer {
    fn score(&self, text: &str) -> i64 {
        score(text)
    }
}

/// Score free text against the fixed lexicon
pub fn score(text: &str) -> i64 {
    let tokens = tokenize(text);

    let mut total = 0i64;
    for (i, token) in tokens.iter().enumerate() {
        let base = if lexicon::POSITIVE.contains(token.as_str()) {
            1
        } else if lexicon::NEGATIVE.contains(token.as_str()) {
            -1
        } else {
            continue;
        };

        total += modified_contribution(base, &tokens[..i]);
    }

    total
}

/// Lowercase word tokens: runs of alphanumeric characters, keeping inner
/// apostrophes so contractions like "don't" stay one token.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|token| token.trim_matches('\''))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Apply the modifier chain directly before a sentiment word, right to left.
/// The chain ends at the first token that is neither a negator nor an
/// intensifier.
fn modified_contribution(base: i64, preceding: &[String]) -> i64 {
    let mut value = base;
    for token in preceding.iter().rev() {
        if lexicon::NEGATORS.contains(token.as_str()) {
            value = -value;
        } else if lexicon::INTENSIFIERS.contains(token.as_str()) {
            value *= 2;
        } else {
            break;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(score(""), 0);
        assert_eq!(score("   \t\n  "), 0);
    }

    #[test]
    fn test_unknown_words_score_zero() {
        assert_eq!(score("the syllabus covers linear algebra"), 0);
    }

    #[test]
    fn test_positive_and_negative_words() {
        assert_eq!(score("good"), 1);
        assert_eq!(score("boring"), -1);
        assert_eq!(score("excellent and clear"), 2);
        assert_eq!(score("great lectures, terrible assignments"), 0);
    }

    #[test]
    fn test_negation_inverts() {
        assert_eq!(score("not good"), -1);
        assert_eq!(score("not boring"), 1);
        assert!(score("not good") <= score("good"));
    }

    #[test]
    fn test_intensifier_doubles() {
        assert_eq!(score("very good"), 2);
        assert_eq!(score("extremely boring"), -2);
    }

    #[test]
    fn test_modifier_chain() {
        assert_eq!(score("not very good"), -2);
        assert_eq!(score("really really good"), 4);
        // Double negation cancels out
        assert_eq!(score("not not good"), 1);
    }

    #[test]
    fn test_chain_broken_by_plain_word() {
        // "not" is separated from "good" by a non-modifier word, so the
        // negation does not reach it
        assert_eq!(score("not the good one"), 1);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(score("GREAT course"), 1);
        assert_eq!(score("Very Helpful"), 2);
    }

    #[test]
    fn test_punctuation_ignored() {
        assert_eq!(score("excellent!!! ... (clear)"), 2);
    }

    #[test]
    fn test_contractions() {
        assert_eq!(score("don't like"), -1);
        // Curly apostrophe normalizes to the same token
        assert_eq!(score("don\u{2019}t like"), -1);
    }

    #[test]
    fn test_deterministic() {
        let text = "very engaging but the pace was not great";
        let first = score(text);
        for _ in 0..10 {
            assert_eq!(score(text), first);
        }
    }

    #[test]
    fn test_trait_object_matches_free_function() {
        let scorer: &dyn TextScorer = &LexiconScorer;
        assert_eq!(scorer.score("not very good"), score("not very good"));
    }
}
