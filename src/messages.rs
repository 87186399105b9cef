//! Bilingual UI messages
//!
//! Every user-facing label exists in both supported languages. Tables are
//! JSON documents (one per language, `@`-prefixed keys are metadata)
//! embedded at build time. Messages may use `$1`-style placeholders and
//! `{{PLURAL:$1|one|other}}`, resolved with CLDR plural rules.

use crate::ast::AstNode;
use crate::parser::Parser;
use crate::route::Language;
use chrono::{DateTime, Datelike, Local, NaiveDate};
use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

const EN_MESSAGES: &str = include_str!("../i18n/en.json");
const BN_MESSAGES: &str = include_str!("../i18n/bn.json");

const BN_MONTHS_SHORT: [&str; 12] = [
    "জানু", "ফেব", "মার্চ", "এপ্রি", "মে", "জুন", "জুল", "আগ", "সেপ", "অক্টো", "নভে", "ডিসে",
];

/// First Bengali digit, `০`
const BENGALI_ZERO: u32 = 0x09E6;

pub struct LocalizedMessages(pub HashMap<String, String>);

impl LocalizedMessages {
    pub fn new() -> Self {
        LocalizedMessages(HashMap::new())
    }

    pub fn with_message(&mut self, key: &str, message: &str) -> &mut Self {
        self.0.insert(key.to_owned(), message.to_owned());
        self
    }

    pub fn get_message(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }

    /// Parse a message table
    ///
    /// ```json
    /// {
    ///     "@metadata": { ... },  // Ignored
    ///     "message-key": "message text"
    /// }
    /// ```
    pub fn from_json(content: &str, source: &str) -> Result<Self, String> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse JSON from '{}': {}", source, e))?;

        let obj = json
            .as_object()
            .ok_or_else(|| format!("Invalid JSON in '{}': root must be an object", source))?;

        let mut messages = LocalizedMessages::new();
        for (key, value) in obj {
            if key.starts_with('@') {
                continue;
            }
            match value.as_str() {
                Some(message) => {
                    messages.with_message(key, message);
                }
                None => warn!("Message '{}' in '{}' is not a string, skipping", key, source),
            }
        }
        Ok(messages)
    }
}

impl Default for LocalizedMessages {
    fn default() -> Self {
        Self::new()
    }
}

/// Message tables and plural rules for both languages
pub struct Catalog {
    messages: HashMap<Language, LocalizedMessages>,
    plural_rules: HashMap<Language, PluralRules>,
}

impl Catalog {
    /// Catalogue built from the embedded message tables
    pub fn builtin() -> Result<Self, String> {
        let mut messages = HashMap::new();
        messages.insert(Language::En, LocalizedMessages::from_json(EN_MESSAGES, "en.json")?);
        messages.insert(Language::Bn, LocalizedMessages::from_json(BN_MESSAGES, "bn.json")?);
        Self::with_messages(messages)
    }

    pub fn with_messages(messages: HashMap<Language, LocalizedMessages>) -> Result<Self, String> {
        let mut plural_rules = HashMap::new();
        for language in [Language::Bn, Language::En] {
            let locale: Locale = language
                .code()
                .parse()
                .map_err(|e| format!("Invalid locale '{}': {:?}", language, e))?;
            let rules = PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into())
                .map_err(|e| {
                    format!("Failed to create PluralRules for locale '{}': {}", language, e)
                })?;
            plural_rules.insert(language, rules);
        }
        Ok(Catalog {
            messages,
            plural_rules,
        })
    }

    /// Raw message text; falls back to English, then to the key itself
    pub fn get_message(&self, language: Language, key: &str) -> String {
        [language, Language::En]
            .iter()
            .find_map(|lang| self.messages.get(lang).and_then(|m| m.get_message(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Label without parameters
    pub fn label(&self, language: Language, key: &str) -> String {
        self.localize(language, key, &[])
    }

    pub fn localize(&self, language: Language, key: &str, values: &[String]) -> String {
        let message = self.get_message(language, key);
        self.render(language, &message, values)
    }

    fn render(&self, language: Language, message: &str, values: &[String]) -> String {
        let mut parser = Parser::new(message);
        let mut result = String::new();

        for node in parser.parse() {
            match node {
                AstNode::Text(text) => result.push_str(&text),
                AstNode::Placeholder(placeholder) => match placeholder.value(values) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&placeholder.name),
                },
                AstNode::Plural(plural) => {
                    let count = plural.placeholder.value(values).and_then(parse_count);
                    let form = self.plural_form(language, count, &plural.forms);
                    result.push_str(&self.render(language, form, values));
                }
            }
        }
        result
    }

    /// Pick the `one` form (first) or the `other` form (last)
    fn plural_form<'f>(&self, language: Language, count: Option<usize>, forms: &'f [String]) -> &'f str {
        let category = match (count, self.plural_rules.get(&language)) {
            (Some(n), Some(rules)) => rules.category_for(n),
            _ => PluralCategory::Other,
        };
        let form = match category {
            PluralCategory::One => forms.first(),
            _ => forms.last(),
        };
        form.map(|f| f.as_str()).unwrap_or("")
    }

    /// Render an integer in the language's digits
    pub fn format_number(language: Language, n: usize) -> String {
        localize_digits(language, &n.to_string())
    }

    /// Date as shown in the history list: `Oct 18, 2026` / `১৮ অক্টো, ২০২৬`
    pub fn format_date(language: Language, date: NaiveDate) -> String {
        match language {
            Language::En => date.format("%b %-d, %Y").to_string(),
            Language::Bn => format!(
                "{} {}, {}",
                localize_digits(language, &date.day().to_string()),
                BN_MONTHS_SHORT[date.month0() as usize],
                localize_digits(language, &date.year().to_string()),
            ),
        }
    }

    /// Local calendar date of an epoch-millisecond timestamp; a missing
    /// timestamp renders as the epoch
    pub fn format_timestamp(language: Language, timestamp: Option<i64>) -> String {
        let date = DateTime::from_timestamp_millis(timestamp.unwrap_or(0))
            .map(|utc| utc.with_timezone(&Local).date_naive())
            .unwrap_or_default();
        Self::format_date(language, date)
    }
}

/// ASCII digits to the language's digits (Bengali `০`–`৯` for bn)
pub fn localize_digits(language: Language, text: &str) -> String {
    match language {
        Language::En => text.to_string(),
        Language::Bn => text
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) if c.is_ascii_digit() => char::from_u32(BENGALI_ZERO + d).unwrap_or(c),
                _ => c,
            })
            .collect(),
    }
}

/// Parse a count written in ASCII or Bengali digits
fn parse_count(value: &str) -> Option<usize> {
    let ascii: String = value
        .trim()
        .chars()
        .map(|c| match c as u32 {
            code @ BENGALI_ZERO..=0x09EF => char::from_digit(code - BENGALI_ZERO, 10).unwrap_or(c),
            _ => c,
        })
        .collect();
    ascii.parse().ok()
}
