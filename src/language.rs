//! Binary English/Arabic language detection.
//!
//! Detection runs whatlang's trigram model restricted to the two languages the
//! classifier understands. Anything the model cannot place (empty input,
//! digits and punctuation only, a script with no candidate) is reported as
//! [`Detection::Unknown`] and collapses to English at the
//! [`detect_language`] boundary.

use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use whatlang::{Detector, Lang};

lazy_static! {
    static ref DETECTOR: Detector = Detector::with_allowlist(vec![Lang::Eng, Lang::Ara]);
}

/// Language of a message as understood by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// English, and every non-Arabic language.
    #[serde(rename = "en")]
    En,
    /// Arabic.
    #[serde(rename = "ar")]
    Ar,
}

impl Language {
    /// ISO 639-1 code as stored in the dataset.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Human readable name returned to callers of the inference API.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ar => "Arabic",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a detection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// The detector placed the text in one of the supported languages.
    Detected(Language),
    /// The detector had no usable signal.
    Unknown,
}

impl Detection {
    /// Collapse to a concrete language, defaulting to English.
    pub fn or_default(self) -> Language {
        match self {
            Detection::Detected(lang) => lang,
            Detection::Unknown => Language::En,
        }
    }
}

/// Run the detector without applying the English fallback.
pub fn detect(text: &str) -> Detection {
    match DETECTOR.detect(text) {
        Some(info) if info.lang() == Lang::Ara => Detection::Detected(Language::Ar),
        Some(_) => Detection::Detected(Language::En),
        None => Detection::Unknown,
    }
}

/// Decide whether `text` is Arabic. Never fails.
pub fn detect_language(text: &str) -> Language {
    detect(text).or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_detection() {
        let text = "The package arrived three days late and the courier was rude";
        assert_eq!(detect(text), Detection::Detected(Language::En));
        assert_eq!(detect_language(text), Language::En);
    }

    #[test]
    fn test_arabic_detection() {
        let text = "وصلت الشحنة متأخرة ثلاثة أيام وكان المندوب غير مهذب";
        assert_eq!(detect(text), Detection::Detected(Language::Ar));
        assert_eq!(detect_language("جيد"), Language::Ar);
    }

    #[test]
    fn test_unknown_falls_back_to_english() {
        assert_eq!(detect(""), Detection::Unknown);
        assert_eq!(detect("12345 !!!"), Detection::Unknown);
        assert_eq!(detect_language(""), Language::En);
        assert_eq!(detect_language("   "), Language::En);
    }

    #[test]
    fn test_language_names() {
        assert_eq!(Language::Ar.display_name(), "Arabic");
        assert_eq!(Language::En.display_name(), "English");
        assert_eq!(Language::Ar.to_string(), "ar");
        let json = serde_json::to_string(&Language::Ar).unwrap();
        assert_eq!(json, "\"ar\"");
    }
}
