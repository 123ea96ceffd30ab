//! Guard classification properties on the default keyword tables.

mod init_logging;

use careguard::{
    apply_guard, Category, Classifier, GuardKeywords, DIAGNOSIS_MESSAGE, OUT_OF_SCOPE_MESSAGE,
    TREATMENT_MESSAGE,
};

/// **Scenario**: A diagnosis keyword wins even when clinical-support words are present.
#[test]
fn diagnosis_preempts_clinical_support() {
    let v = apply_guard("Diagnose the cause of this drug allergy");
    assert_eq!(v.category, Category::DiagnosisRequest);
    assert!(!v.allowed);
    assert_eq!(v.block_message.as_deref(), Some(DIAGNOSIS_MESSAGE));
}

/// **Scenario**: A treatment keyword wins over data-retrieval words.
#[test]
fn treatment_preempts_data_retrieval() {
    let v = apply_guard("Look up patient Smith and prescribe something for the pain");
    assert_eq!(v.category, Category::TreatmentRequest);
    assert_eq!(v.block_message.as_deref(), Some(TREATMENT_MESSAGE));
}

#[test]
fn keywords_match_whole_words_only() {
    // "specialist" contains "list"
    let v = apply_guard("Who is the best specialist");
    assert_eq!(v.category, Category::DataRetrieval);
    assert_eq!(
        Classifier::default().category("I need a specialist recommendation"),
        Category::OutOfScope
    );
}

#[test]
fn classification_ignores_case_and_is_deterministic() {
    let a = apply_guard("CHECK DRUG INTERACTIONS for Warfarin");
    let b = apply_guard("check drug interactions for warfarin");
    assert_eq!(a, b);
    assert_eq!(a.category, Category::ClinicalSupport);
    assert!(a.allowed);
    for _ in 0..5 {
        assert_eq!(apply_guard("CHECK DRUG INTERACTIONS for Warfarin"), a);
    }
}

#[test]
fn unrelated_and_empty_text_are_out_of_scope() {
    for text in ["What's the weather today?", "", "   "] {
        let v = apply_guard(text);
        assert_eq!(v.category, Category::OutOfScope, "{text:?}");
        assert_eq!(v.block_message.as_deref(), Some(OUT_OF_SCOPE_MESSAGE));
    }
}

#[test]
fn injected_tables_replace_defaults() {
    let mut keywords = GuardKeywords::default();
    keywords.data_retrieval = careguard::guard::KeywordSet::new(["chart"]);
    let classifier = Classifier::new(keywords).unwrap();
    assert_eq!(classifier.category("open the chart"), Category::DataRetrieval);
    assert_eq!(classifier.category("find patient Smith"), Category::OutOfScope);
}
