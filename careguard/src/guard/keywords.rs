//! Keyword tables, one ordered set per matchable category.

/// Ordered lowercase phrases for one category.
///
/// Phrases are normalised on construction: trimmed, lowercased, empty ones dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSet {
    phrases: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, T>(phrases: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// Immutable keyword configuration for the classifier.
///
/// Sets are checked in field order: diagnosis, treatment, clinical support, data
/// retrieval. Input matching none of them is out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardKeywords {
    pub diagnosis: KeywordSet,
    pub treatment: KeywordSet,
    pub clinical_support: KeywordSet,
    pub data_retrieval: KeywordSet,
}

impl Default for GuardKeywords {
    fn default() -> Self {
        Self {
            diagnosis: KeywordSet::new([
                "diagnose",
                "what disease",
                "what condition",
                "what's wrong with",
                "what is wrong with",
            ]),
            treatment: KeywordSet::new([
                "prescribe",
                "what should i take",
                "recommend treatment",
                "what medication should",
            ]),
            clinical_support: KeywordSet::new([
                "interaction",
                "interactions",
                "allergy",
                "allergies",
                "allergic",
                "medication",
                "medications",
                "drug",
                "prescription",
            ]),
            data_retrieval: KeywordSet::new([
                "look up", "lookup", "find", "search", "show", "list", "get", "who is",
                "patient", "provider", "record",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_set_normalises_phrases() {
        let set = KeywordSet::new(["  Look Up ", "", "FIND"]);
        assert_eq!(set.phrases(), &["look up".to_string(), "find".to_string()]);
    }

    #[test]
    fn default_tables_are_populated() {
        let k = GuardKeywords::default();
        assert_eq!(k.diagnosis.phrases().len(), 5);
        assert_eq!(k.treatment.phrases().len(), 4);
        assert_eq!(k.clinical_support.phrases().len(), 9);
        assert_eq!(k.data_retrieval.phrases().len(), 11);
    }
}
