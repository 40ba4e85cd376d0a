//! Classified record store and derived views.
//!
//! A [`Directory`] is built once per load of the data source. Each record is
//! classified and its search haystack precomputed at insertion, so a view is
//! a single filter pass plus grouping.
//!
//! Pipeline per view:
//! - **Filter**: category selector, then case-insensitive substring query
//! - **Group**: category-specific key, first-seen display name, meta summary
//! - **Sort**: groups by the configured policy, items by address
//!
//! Threading:
//! - Views borrow the directory immutably. Recomputing on every input event is
//!   safe and needs no locking.

mod api;
mod filter;
mod grouper;
mod stats;
mod types;
mod view;

pub use filter::QueryMatcher;
pub use grouper::{group_label, Grouper};
pub use stats::DirectoryStats;
pub use types::{Classified, Directory, SEARCH_FIELD_DELIMITER};
pub use view::{maps_link, summary_line, DirectoryView, ViewState};
