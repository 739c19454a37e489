//! Sentence templating for synthetic symptom descriptions.
//!
//! Rendering steps:
//! 1. Pick how many symptoms to mention (2, 3 or 4 with weights 0.3/0.5/0.2)
//! 2. Sample that many distinct symptoms from the disease vocabulary
//! 3. Localize and join them with the language's connectors
//! 4. Fill a random template with the phrase, a duration and a severity
//! 5. Optionally prepend a greeting and append a closing phrase

use rand::seq::index;
use rand::seq::SliceRandom;
use rand::Rng;

use super::lexicon::Lexicon;
use crate::models::{DiseaseRecord, Language};

/// Symptom counts and their weights.
const SYMPTOM_COUNT_WEIGHTS: [(usize, f64); 3] = [(2, 0.3), (3, 0.5), (4, 0.2)];

const EN_TEMPLATES: &[&str] = &[
    "I have been experiencing {symptoms} for {duration}.",
    "Since {duration} I've had {symptoms}.",
    "For the past {duration} I'm noticing {symptoms}.",
    "{symptoms} started {duration} ago and it's getting {severity}.",
    "I feel {symptoms} and it's been {duration}.",
    "I've been feeling {severity} with {symptoms} for {duration}.",
    "My problem: {symptoms}. It's been {duration}.",
    "Lately, I’ve noticed {symptoms} over {duration}.",
    "For the last {duration}, I’m troubled by {symptoms}.",
    "I’m experiencing {symptoms} since {duration}, it seems {severity}.",
    "Could you help? I have {symptoms} for {duration}.",
    "It started {duration} ago: {symptoms}, getting {severity}.",
    "I feel {symptoms} for {duration}, can this be serious?",
];

const BN_TEMPLATES: &[&str] = &[
    "আমি {symptoms} {duration} থেকে অনুভব করছি।",
    "গত {duration} ধরে আমার সমস্যা হচ্ছে {symptoms}।",
    "আমার কাছে {duration} ধরে {symptoms} আছে।",
    "{symptoms} {duration} থেকে হচ্ছে, দয়া করে দেখুন।",
    "ডাক্তার, আমি {duration} ধরে {symptoms} অনুভব করছি।",
    "আমার সমস্যা: {symptoms}, এটি {duration} ধরে চলছে।",
];

const EN_DURATIONS: &[&str] = &[
    "2 hours",
    "6 hours",
    "1 day",
    "2 days",
    "3 days",
    "1 week",
    "2 weeks",
    "since yesterday",
    "since morning",
];

const BN_DURATIONS: &[&str] = &[
    "২ ঘন্টা",
    "৬ ঘন্টা",
    "১ দিন",
    "২ দিন",
    "৩ দিন",
    "১ সপ্তাহ",
    "২ সপ্তাহ",
    "গতকাল থেকে",
    "আজ সকাল থেকে",
];

const EN_SEVERITIES: &[&str] = &[
    "mild",
    "moderate",
    "severe",
    "getting worse",
    "worsening",
    "a little better",
];

/// A probabilistic cosmetic edit: with `probability`, add one of `phrases`.
#[derive(Debug, Clone, Copy)]
pub struct Mutation {
    pub probability: f64,
    pub phrases: &'static [&'static str],
}

/// How symptom lists are joined.
#[derive(Debug, Clone, Copy)]
pub struct Connectors {
    /// Between exactly two items
    pub pair: &'static str,
    /// Between items of a longer list, except the last
    pub separator: &'static str,
    /// Before the last item of a longer list
    pub last: &'static str,
}

impl Connectors {
    pub fn join(&self, items: &[String]) -> String {
        match items {
            [] => String::new(),
            [only] => only.clone(),
            [a, b] => format!("{}{}{}", a, self.pair, b),
            [head @ .., tail] => format!("{}{}{}", head.join(self.separator), self.last, tail),
        }
    }
}

/// Everything language-specific about rendering.
#[derive(Debug, Clone, Copy)]
pub struct LanguageProfile {
    pub templates: &'static [&'static str],
    pub durations: &'static [&'static str],
    /// Empty when the language's templates take no severity
    pub severities: &'static [&'static str],
    pub connectors: Connectors,
    pub greeting: Option<Mutation>,
    pub closing: Option<Mutation>,
}

const EN_CONNECTORS: Connectors = Connectors {
    pair: " and ",
    separator: ", ",
    last: ", and ",
};

const BN_CONNECTORS: Connectors = Connectors {
    pair: " এবং ",
    separator: " , ",
    last: " এবং ",
};

impl LanguageProfile {
    /// Built-in profile for a language.
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => Self {
                templates: EN_TEMPLATES,
                durations: EN_DURATIONS,
                severities: EN_SEVERITIES,
                connectors: EN_CONNECTORS,
                greeting: Some(Mutation {
                    probability: 0.15,
                    phrases: &["Hi doc, ", "Doc, ", "Hello, "],
                }),
                closing: Some(Mutation {
                    probability: 0.12,
                    phrases: &[" Could this be serious?"],
                }),
            },
            Language::Bn => Self {
                templates: BN_TEMPLATES,
                durations: BN_DURATIONS,
                severities: &[],
                connectors: BN_CONNECTORS,
                greeting: Some(Mutation {
                    probability: 0.15,
                    phrases: &["ডাক্তার, "],
                }),
                closing: None,
            },
            Language::Banglish => Self {
                templates: EN_TEMPLATES,
                durations: EN_DURATIONS,
                severities: EN_SEVERITIES,
                connectors: EN_CONNECTORS,
                greeting: None,
                closing: Some(Mutation {
                    probability: 0.12,
                    phrases: &[" doctor please"],
                }),
            },
            Language::Mixed => Self {
                templates: EN_TEMPLATES,
                durations: EN_DURATIONS,
                severities: EN_SEVERITIES,
                connectors: EN_CONNECTORS,
                greeting: None,
                closing: Some(Mutation {
                    probability: 1.0,
                    phrases: &[" দয়া করে সাহায্য করুন।", " একটু দেখবেন?", " ধন্যবাদ।"],
                }),
            },
        }
    }
}

/// A rendered sentence plus the symptoms it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedText {
    pub text: String,
    /// Chosen catalog symptoms (English), in rendered order
    pub symptoms: Vec<String>,
    pub language: Language,
}

/// Fills language templates with sampled symptoms.
#[derive(Default)]
pub struct TextTemplater {
    lexicon: Lexicon,
}

impl TextTemplater {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Render one symptom description for `record` in `language`.
    pub fn render<R: Rng + ?Sized>(
        &self,
        record: &DiseaseRecord,
        language: Language,
        rng: &mut R,
    ) -> RenderedText {
        let profile = LanguageProfile::for_language(language);

        // Step 1-2: how many symptoms, then which ones
        let count = choose_symptom_count(rng).min(record.symptoms.len());
        let symptoms: Vec<String> = index::sample(rng, record.symptoms.len(), count)
            .into_iter()
            .map(|i| record.symptoms[i].clone())
            .collect();

        // Step 3: localize and join
        let localized: Vec<String> = symptoms
            .iter()
            .map(|s| self.localize(s, language, rng))
            .collect();
        let phrase = profile.connectors.join(&localized);

        // Step 4: fill template
        let duration = profile.durations.choose(rng).copied().unwrap_or_default();
        let severity = profile.severities.choose(rng).copied().unwrap_or_default();
        let template = profile.templates.choose(rng).copied().unwrap_or("{symptoms}");
        let mut text = template
            .replace("{symptoms}", &phrase)
            .replace("{duration}", duration)
            .replace("{severity}", severity);

        // Step 5: cosmetic mutations
        if let Some(greeting) = profile.greeting {
            if let Some(prefix) = apply_mutation(&greeting, rng) {
                text.insert_str(0, prefix);
            }
        }
        if let Some(closing) = profile.closing {
            if let Some(suffix) = apply_mutation(&closing, rng) {
                text.push_str(suffix);
            }
        }

        RenderedText {
            text,
            symptoms,
            language,
        }
    }

    fn localize<R: Rng + ?Sized>(&self, symptom: &str, language: Language, rng: &mut R) -> String {
        match language {
            Language::En => symptom.to_string(),
            Language::Bn => self.lexicon.to_bangla(symptom).to_string(),
            Language::Banglish => self.lexicon.to_banglish(symptom),
            Language::Mixed => {
                if rng.gen_bool(0.5) {
                    self.lexicon.to_bangla(symptom).to_string()
                } else {
                    symptom.to_string()
                }
            }
        }
    }
}

fn choose_symptom_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (count, weight) in SYMPTOM_COUNT_WEIGHTS {
        cumulative += weight;
        if roll < cumulative {
            return count;
        }
    }
    SYMPTOM_COUNT_WEIGHTS[SYMPTOM_COUNT_WEIGHTS.len() - 1].0
}

fn apply_mutation<R: Rng + ?Sized>(mutation: &Mutation, rng: &mut R) -> Option<&'static str> {
    if rng.gen_bool(mutation.probability.clamp(0.0, 1.0)) {
        mutation.phrases.choose(rng).copied()
    } else {
        None
    }
}
