use anyhow::{Result, anyhow};
use isolang::Language;
use std::fmt;
use std::str::FromStr;

/// Language utilities for ISO language code handling
///
/// The translation service addresses languages by pairs such as "en-tw"
/// (English to Twi). Codes are ISO 639-1 (2-letter) or ISO 639-3 (3-letter),
/// since several Ghanaian languages ("gaa", "dag", "fat") have no 2-letter code.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-3 (3-letter) code
    Part3,
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-3 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 if Language::from_639_1(&normalized_code).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&normalized_code).is_some() => Ok(LanguageCodeType::Part3),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();
    let lang = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}

/// Source and target language of a translation, written "src-tgt"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    /// Human readable form, e.g. "English -> Twi"
    pub fn describe(&self) -> String {
        let source = get_language_name(&self.source).unwrap_or_else(|_| self.source.clone());
        let target = get_language_name(&self.target).unwrap_or_else(|_| self.target.clone());
        format!("{} -> {}", source, target)
    }
}

impl FromStr for LanguagePair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (source, target) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("Language pair must look like 'en-tw', got '{}'", s))?;

        validate_language_code(source)?;
        validate_language_code(target)?;

        if source.eq_ignore_ascii_case(target) {
            return Err(anyhow!("Source and target language are the same: {}", s));
        }

        Ok(Self {
            source: source.trim().to_lowercase(),
            target: target.trim().to_lowercase(),
        })
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}
