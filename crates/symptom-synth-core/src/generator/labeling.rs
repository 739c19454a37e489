//! Synthetic labels attached to each accepted sample.

use rand::seq::SliceRandom;
use rand::Rng;

use super::lexicon::Lexicon;
use super::{GenerationError, GenerationResult};
use crate::metrics::{normalized_entropy, round_to};
use crate::models::{DiseaseRecord, Language};

/// Range for the primary disease probability.
const PRIMARY_RANGE: (f64, f64) = (0.55, 0.85);

/// Lower bound for the first confounder probability.
const SECONDARY_FLOOR: f64 = 0.05;

/// Mass kept back from the first confounder for the second.
const SECONDARY_MARGIN: f64 = 0.02;

/// Maximum explanation tokens per sample.
const MAX_EXPLAIN_TOKENS: usize = 3;

/// Pick `[primary, confounder_a, confounder_b]` for a disease.
///
/// Confounders come from the record; when fewer than two usable ones exist
/// the pool is padded with other configured diseases.
pub fn pick_confounders<R: Rng + ?Sized>(
    record: &DiseaseRecord,
    all_diseases: &[String],
    rng: &mut R,
) -> GenerationResult<[String; 3]> {
    let mut pool: Vec<&str> = record.distinct_confounders();

    if pool.len() < 2 {
        let extras: Vec<&str> = all_diseases
            .iter()
            .map(|d| d.as_str())
            .filter(|d| *d != record.name && !pool.contains(d))
            .collect();
        let needed = 2 - pool.len();
        if extras.len() < needed {
            return Err(GenerationError::InsufficientConfounders(record.name.clone()));
        }
        pool.extend(extras.choose_multiple(rng, needed).copied());
    }

    let chosen: Vec<&str> = pool.choose_multiple(rng, 2).copied().collect();
    match chosen.as_slice() {
        [a, b] => Ok([record.name.clone(), a.to_string(), b.to_string()]),
        _ => Err(GenerationError::InsufficientConfounders(record.name.clone())),
    }
}

/// Synthetic probabilities for `[primary, confounder_a, confounder_b]`.
///
/// Always non-negative, rounded to two decimals and summing to 1.0; the
/// primary takes the largest share.
pub fn sample_probabilities<R: Rng + ?Sized>(rng: &mut R) -> [f64; 3] {
    let p1 = rng.gen_range(PRIMARY_RANGE.0..PRIMARY_RANGE.1);
    let rest = 1.0 - p1;
    let upper = rest - SECONDARY_MARGIN;
    let p2 = if upper > SECONDARY_FLOOR {
        rng.gen_range(SECONDARY_FLOOR..upper)
    } else {
        rest / 2.0
    };
    let p3 = rest - p2;

    normalize_and_round([p1, p2.max(0.0), p3.max(0.0)])
}

/// Normalize to sum 1, round to two decimals, and push any rounding residual
/// onto the largest element.
pub fn normalize_and_round(probs: [f64; 3]) -> [f64; 3] {
    let total: f64 = probs.iter().sum();
    if total <= 0.0 {
        return [1.0, 0.0, 0.0];
    }
    let mut rounded = probs.map(|p| round_to(p / total, 2));

    let residual = 1.0 - rounded.iter().sum::<f64>();
    if residual.abs() > 1e-6 {
        // First index wins ties
        let mut largest = 0;
        for (i, p) in rounded.iter().enumerate().skip(1) {
            if *p > rounded[largest] {
                largest = i;
            }
        }
        rounded[largest] = round_to(rounded[largest] + residual, 2);
    }
    rounded
}

/// Normalized entropy of a probability triple, rounded to two decimals.
pub fn uncertainty(probs: &[f64; 3]) -> f64 {
    round_to(normalized_entropy(probs), 2)
}

/// Catalog symptoms that appear in `text`.
///
/// Matching is case-insensitive and also accepts the symptom's localized
/// form for `language`, so Bangla and Banglish text can match English seeds.
pub fn symptoms_in_text<'a>(
    record: &'a DiseaseRecord,
    text: &str,
    language: Language,
    lexicon: &Lexicon,
) -> Vec<&'a str> {
    let haystack = text.to_lowercase();
    record
        .symptoms
        .iter()
        .filter(|symptom| {
            lexicon
                .surface_forms(symptom, language)
                .iter()
                .any(|form| haystack.contains(&form.to_lowercase()))
        })
        .map(|s| s.as_str())
        .collect()
}

/// Comma-joined explanation tokens for a sample.
///
/// Words longer than two characters are taken from the matched symptoms
/// (or the first three seed symptoms when nothing matched), shuffled,
/// deduplicated and truncated to three.
pub fn explainability_tokens<R: Rng + ?Sized>(
    record: &DiseaseRecord,
    matched: &[&str],
    rng: &mut R,
) -> String {
    let source: Vec<&str> = if matched.is_empty() {
        record.symptoms.iter().take(3).map(|s| s.as_str()).collect()
    } else {
        matched.to_vec()
    };

    let mut words: Vec<&str> = source
        .iter()
        .flat_map(|s| s.split_whitespace())
        .filter(|w| w.chars().count() > 2)
        .collect();
    words.shuffle(rng);

    let mut unique: Vec<&str> = Vec::with_capacity(MAX_EXPLAIN_TOKENS);
    for word in words {
        if unique.len() == MAX_EXPLAIN_TOKENS {
            break;
        }
        if !unique.contains(&word) {
            unique.push(word);
        }
    }
    unique.join(", ")
}
