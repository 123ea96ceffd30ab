//! Ordered whole-word keyword classifier.

use regex::Regex;

use super::category::Category;
use super::keywords::{GuardKeywords, KeywordSet};
use super::verdict::block_message_for;

/// Returned by [`Classifier::new`] when a keyword set cannot be compiled.
///
/// Escaped phrases are always valid syntax, so in practice this is a set too large
/// for the regex size limit.
#[derive(Debug, thiserror::Error)]
#[error("keyword set for {category} does not compile: {source}")]
pub struct ClassifierError {
    pub category: Category,
    #[source]
    pub source: regex::Error,
}

/// Whole-word pattern for a keyword set, or `None` when the set is empty.
///
/// Each phrase is bounded by `\b` on both sides; whitespace inside a phrase matches
/// one or more whitespace characters.
fn compile_set(set: &KeywordSet) -> Option<Result<Regex, regex::Error>> {
    if set.is_empty() {
        return None;
    }
    let alternatives: Vec<String> = set
        .phrases()
        .iter()
        .map(|phrase| {
            phrase
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();
    let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
    Some(Regex::new(&pattern))
}

/// Maps raw text to one [`Category`].
///
/// Patterns are compiled once at construction; `classify` never fails. A set that
/// does not compile is a construction error, never a silently missing rule.
#[derive(Debug, Clone)]
pub struct Classifier {
    keywords: GuardKeywords,
    rules: Vec<(Category, Regex)>,
}

impl Classifier {
    pub fn new(keywords: GuardKeywords) -> Result<Self, ClassifierError> {
        let ordered = [
            (Category::DiagnosisRequest, &keywords.diagnosis),
            (Category::TreatmentRequest, &keywords.treatment),
            (Category::ClinicalSupport, &keywords.clinical_support),
            (Category::DataRetrieval, &keywords.data_retrieval),
        ];
        let mut rules = Vec::with_capacity(ordered.len());
        for (category, set) in ordered {
            match compile_set(set) {
                Some(Ok(re)) => rules.push((category, re)),
                Some(Err(source)) => return Err(ClassifierError { category, source }),
                None => {}
            }
        }
        Ok(Self { keywords, rules })
    }

    /// Classifier with no rules: every request is out of scope and blocked.
    fn block_all(keywords: GuardKeywords) -> Self {
        Self {
            keywords,
            rules: Vec::new(),
        }
    }

    pub fn keywords(&self) -> &GuardKeywords {
        &self.keywords
    }

    /// Category of `text` plus the block message for blocked categories.
    pub fn classify(&self, text: &str) -> (Category, Option<&'static str>) {
        let normalized = text.trim().to_lowercase();
        let category = self
            .rules
            .iter()
            .find(|(_, re)| re.is_match(&normalized))
            .map(|(category, _)| *category)
            .unwrap_or(Category::OutOfScope);
        (category, block_message_for(category))
    }

    pub fn category(&self, text: &str) -> Category {
        self.classify(text).0
    }
}

impl Default for Classifier {
    /// Built-in tables. Should they ever fail to compile, the classifier blocks
    /// every request instead of dropping a rule.
    fn default() -> Self {
        Self::new(GuardKeywords::default()).unwrap_or_else(|e| {
            tracing::error!(error = %e, "built-in guard keywords failed to compile");
            Self::block_all(GuardKeywords::default())
        })
    }
}
