//! Gate-code directory pipeline.
//!
//! Loads address records, classifies each as apartments, businesses or
//! residential, and derives filtered, grouped views for a presenter.
//!
//! ```
//! use gatebook_core::{Directory, ViewState};
//! use gatebook_types::{Category, DirectoryConfig};
//! use serde_json::json;
//!
//! let directory = Directory::from_entries(
//!     &[json!({ "community": "Oak Park", "address": "12 Elm St", "gate_code": "# 4521" })],
//!     DirectoryConfig::default(),
//! );
//! let view = directory.view(&ViewState::new(Category::Residential.into()));
//! assert_eq!(view.groups[0].name, "Oak Park");
//! assert_eq!(view.groups[0].items[0].gate_code, "4521");
//! ```

pub mod analyzer;
pub mod index;
pub mod source;

pub use analyzer::{classify, Classifier};
pub use index::{Directory, DirectoryStats, DirectoryView, ViewState};
pub use source::load_path;
