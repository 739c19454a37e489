//! Symptom lexicon for localized rendering.
//!
//! Handles:
//! - English symptom → Bangla phrase (unknown symptoms stay in English)
//! - Bangla word → Latin transliteration for Banglish text

use std::collections::HashMap;

use crate::models::Language;

/// Symptom translations used by the templater and explainability matching.
pub struct Lexicon {
    /// English symptom → Bangla phrase
    bangla: HashMap<String, String>,
    /// Bangla word → Latin transliteration
    transliterations: HashMap<String, String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    /// Create a lexicon with the default mappings.
    pub fn new() -> Self {
        Self {
            bangla: Self::default_bangla(),
            transliterations: Self::default_transliterations(),
        }
    }

    /// Bangla phrase for a symptom, or the symptom itself when unmapped.
    pub fn to_bangla<'a>(&'a self, symptom: &'a str) -> &'a str {
        self.bangla.get(symptom).map(|s| s.as_str()).unwrap_or(symptom)
    }

    /// Latin-script Banglish for a symptom, transliterated word by word.
    pub fn to_banglish(&self, symptom: &str) -> String {
        self.to_bangla(symptom)
            .split_whitespace()
            .map(|word| {
                self.transliterations
                    .get(word)
                    .map(|s| s.as_str())
                    .unwrap_or(word)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Forms a symptom may take in text rendered in `language`.
    ///
    /// The English phrase is always included; mixed text may use either form.
    pub fn surface_forms(&self, symptom: &str, language: Language) -> Vec<String> {
        let mut forms = vec![symptom.to_string()];
        let extra = match language {
            Language::En => None,
            Language::Bn | Language::Mixed => Some(self.to_bangla(symptom).to_string()),
            Language::Banglish => Some(self.to_banglish(symptom)),
        };
        if let Some(form) = extra {
            if !forms.contains(&form) {
                forms.push(form);
            }
        }
        forms
    }

    /// English symptom and Bangla phrase pairs, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bangla.iter().map(|(en, bn)| (en.as_str(), bn.as_str()))
    }

    /// Add or replace a Bangla mapping.
    pub fn add_bangla(&mut self, symptom: &str, bangla: &str) {
        self.bangla.insert(symptom.to_string(), bangla.to_string());
    }

    /// Default English → Bangla symptom mappings.
    fn default_bangla() -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("fever".into(), "জ্বর".into());
        map.insert("severe headache".into(), "চরম মাথা ব্যথা".into());
        map.insert("body pain".into(), "শরীর ব্যথা".into());
        map.insert("rash".into(), "চামড়ার র‍্যাশ".into());
        map.insert("nausea".into(), "বমি ভাব".into());
        map.insert("joint pain".into(), "জয়েন্ট ব্যথা".into());
        map.insert("chills".into(), "কাঁপুনি".into());
        map.insert("sweating".into(), "ঘাম".into());
        map.insert("cough".into(), "কাশি".into());
        map.insert("mucus".into(), "কফ".into());
        map.insert("abdominal pain".into(), "পেট ব্যথা".into());
        map.insert("vomiting".into(), "বমি".into());
        map.insert("diarrhea".into(), "ডায়রিয়া".into());
        map.insert("dark urine".into(), "গাঢ় প্রস্রাব".into());
        map.insert("yellowing skin/eyes".into(), "চামড়া/চোখ হলুদ হওয়া".into());
        map.insert("shortness of breath".into(), "শ্বাসকষ্ট".into());
        map.insert("burning urination".into(), "প্রস্রাবে জ্বালা".into());
        map.insert("frequent urination".into(), "ঘন ঘন প্রস্রাব".into());
        map.insert("increased thirst".into(), "বেশি তৃষ্ণা".into());
        map.insert("fatigue".into(), "ক্লান্তি".into());
        map.insert("weight loss".into(), "ওজন কমা".into());
        map.insert("headache".into(), "মাথা ব্যথা".into());
        map.insert("dizziness".into(), "মাথা ঘোরা".into());
        map.insert("pale skin".into(), "ফ্যাকাসে ত্বক".into());
        map.insert("sore throat".into(), "গলা ব্যথা".into());
        map.insert("runny nose".into(), "নাক দিয়ে পানি পড়া".into());
        map.insert("sneezing".into(), "হাঁচি".into());
        map.insert("itching".into(), "চুলকানি".into());
        map.insert("redness".into(), "লালচে ভাব".into());
        map.insert("hives".into(), "যোন".into());
        map.insert("blurred vision".into(), "দৃষ্টি ঝাপসা".into());
        map.insert("nausea after fatty meals".into(), "তেলযুক্ত খাবারের পর বমি".into());
        map.insert("neck stiffness".into(), "ঘাড় শক্ত".into());
        map.insert("sensitivity to light".into(), "আলোর প্রতি সংবেদনশীলতা".into());

        map
    }

    /// Default word-level Bangla to Latin transliterations (approximate).
    fn default_transliterations() -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("আমি".into(), "ami".into());
        map.insert("জ্বর".into(), "jôr".into());
        map.insert("চরম".into(), "charom".into());
        map.insert("মাথা".into(), "matha".into());
        map.insert("ব্যথা".into(), "byatha".into());
        map.insert("শরীর".into(), "shorir".into());
        map.insert("বমি".into(), "bomi".into());
        map.insert("র‍্যাশ".into(), "rash".into());
        map.insert("কাঁপুনি".into(), "kapuni".into());
        map.insert("ঘাম".into(), "gham".into());
        map.insert("কাশি".into(), "kashi".into());
        map.insert("কফ".into(), "kof".into());
        map.insert("পেট".into(), "pet".into());
        map.insert("ডায়রিয়া".into(), "diarrhea".into());
        map.insert("প্রস্রাবে".into(), "prosrab e".into());
        map.insert("জ্বালা".into(), "jwala".into());
        map.insert("তৃষ্ণা".into(), "trishna".into());
        map.insert("ক্লান্তি".into(), "klanti".into());
        map.insert("ওজন".into(), "ozon".into());
        map.insert("কমা".into(), "koma".into());
        map.insert("গলা".into(), "gola".into());
        map.insert("নাক".into(), "nak".into());
        map.insert("হাঁচি".into(), "hanchi".into());
        map.insert("চুলকানি".into(), "chulkani".into());
        map.insert("লালচে".into(), "lalche".into());
        map.insert("দৃষ্টি".into(), "drishti".into());
        map.insert("ঝাপসা".into(), "jhapsa".into());
        map.insert("ঘাড়".into(), "ghar".into());
        map.insert("শক্ত".into(), "shokto".into());
        map.insert("আলো".into(), "alo".into());
        map.insert("সংবেদনশীলতা".into(), "songbedonshilota".into());

        map
    }
}
