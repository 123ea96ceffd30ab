//! Scope guard: deterministic keyword classification of user requests.
//!
//! [`Classifier`] maps raw text to exactly one [`Category`] by checking ordered
//! keyword sets with whole-word matching; the first set that matches wins.
//! [`apply_guard`] / [`Classifier::apply`] turn the result into a [`GuardVerdict`]
//! that blocks diagnosis, treatment and out-of-scope requests with a fixed message.
//!
//! No learned weights: the same input always yields the same verdict.

mod category;
mod classifier;
mod keywords;
mod verdict;

pub use category::{Category, ParseCategoryError};
pub use classifier::{Classifier, ClassifierError};
pub use keywords::{GuardKeywords, KeywordSet};
pub use verdict::{
    apply_guard, block_message_for, GuardVerdict, CLINICAL_DISCLAIMER, DIAGNOSIS_MESSAGE,
    OUT_OF_SCOPE_MESSAGE, TREATMENT_MESSAGE,
};
