//! Record analysis pipeline.
//!
//! This module provides the per-record processing components:
//! - **Normalizer**: Cleans field values and folds labels into keys
//! - **Record**: Turns raw source entries into canonical records
//! - **Tokenizer**: Splits labels into words for heuristics
//! - **Classifier**: Assigns each record exactly one category

pub mod classifier;
pub mod normalizer;
pub mod record;
pub mod tokenizer;

pub use classifier::{classify, ClassificationRule, Classifier};
pub use normalizer::TextNormalizer;
pub use record::{normalize_entries, normalize_record, NormalizedBatch, RawRecord};
pub use tokenizer::Tokenizer;
