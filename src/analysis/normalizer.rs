//! Language-conditioned text normalization.
//!
//! English text is only trimmed. Arabic text additionally goes through three
//! char filters, applied in this order:
//!
//! 1. diacritic (tashkeel) removal
//! 2. hamza normalization: `آ` becomes `ءا`, every hamza carrier becomes `ء`
//! 3. lam-alef ligature folding to `لا`
//!
//! Normalization is idempotent.
//!
//! # Examples
//!
//! ```
//! use tasnif::analysis::normalizer::normalize;
//! use tasnif::language::Language;
//!
//! assert_eq!(normalize("  late delivery ", Language::En), "late delivery");
//! assert_eq!(normalize("مُتَأَخِّر", Language::Ar), "متءخر");
//! ```

use std::sync::Arc;

use lazy_static::lazy_static;

use crate::analysis::char_filter::{CharFilter, MappingCharFilter, StripCharFilter};
use crate::error::Result;
use crate::language::Language;

/// Arabic diacritics: tanween, short vowels, shadda, sukun and superscript alef.
pub const ARABIC_DIACRITICS: [char; 9] = [
    '\u{064B}', '\u{064C}', '\u{064D}', '\u{064E}', '\u{064F}', '\u{0650}', '\u{0651}',
    '\u{0652}', '\u{0670}',
];

const HAMZA: &str = "\u{0621}";

const HAMZA_FORMS: [(&str, &str); 7] = [
    ("\u{0622}", "\u{0621}\u{0627}"),
    ("\u{0623}", HAMZA),
    ("\u{0625}", HAMZA),
    ("\u{0624}", HAMZA),
    ("\u{0626}", HAMZA),
    ("\u{0654}", HAMZA),
    ("\u{0655}", HAMZA),
];

const LAM_ALEF: &str = "\u{0644}\u{0627}";

const LIGATURES: [&str; 8] = [
    "\u{FEF5}", "\u{FEF6}", "\u{FEF7}", "\u{FEF8}", "\u{FEF9}", "\u{FEFA}", "\u{FEFB}",
    "\u{FEFC}",
];

lazy_static! {
    static ref NORMALIZER: TextNormalizer = TextNormalizer::default();
}

/// Chain of char filters applied to Arabic text.
#[derive(Clone)]
pub struct TextNormalizer {
    arabic_filters: Vec<Arc<dyn CharFilter>>,
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field(
                "arabic_filters",
                &self.arabic_filters.iter().map(|cf| cf.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        let diacritics = StripCharFilter::new(ARABIC_DIACRITICS, "arabic_diacritics");
        let hamza = MappingCharFilter::with_name(HAMZA_FORMS.to_vec(), "arabic_hamza")?;
        let ligatures = MappingCharFilter::with_name(
            LIGATURES.iter().map(|l| (*l, LAM_ALEF)).collect(),
            "arabic_ligature",
        )?;

        Ok(Self {
            arabic_filters: vec![Arc::new(diacritics), Arc::new(hamza), Arc::new(ligatures)],
        })
    }

    pub fn normalize(&self, text: &str, language: Language) -> String {
        let trimmed = text.trim();
        match language {
            Language::En => trimmed.to_string(),
            Language::Ar => {
                let mut filtered = trimmed.to_string();
                for char_filter in &self.arabic_filters {
                    filtered = char_filter.filter(&filtered);
                }
                // a removed trailing mark can expose whitespace
                filtered.trim().to_string()
            }
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new().expect("built-in Arabic mappings should be valid")
    }
}

/// Normalize `text` with the shared normalizer.
pub fn normalize(text: &str, language: Language) -> String {
    NORMALIZER.normalize(text, language)
}
