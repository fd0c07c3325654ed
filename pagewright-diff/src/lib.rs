//! # pagewright-diff
//!
//! Anchor-based line diff and patch for pages derived from placeholder
//! templates.
//!
//! A page is diffed against the template it was generated from to recover
//! what it substituted for each placeholder; the resulting [`DiffMap`] is then
//! patched into a newer version of the template.
//!
//! ## Usage
//!
//! ```rust
//! use pagewright_diff::{diff, patch};
//!
//! let old = "<body>\nCONTENT\n</body>\n";
//! let page = "<body>\n<p>Hand written</p>\n</body>\n";
//! let new = "<body>\n<main>\nCONTENT\n</main>\n</body>\n";
//!
//! let map = diff(old, page).expect("page still matches its template");
//! assert_eq!(
//!     patch(&map, new),
//!     "<body>\n<main>\n<p>Hand written</p>\n</main>\n</body>\n"
//! );
//! ```

pub mod diff_map;
pub mod engine;
pub mod error;
pub mod template;

pub use diff_map::DiffMap;
pub use engine::{diff, diff_with, patch};
pub use error::DiffError;
pub use template::{placeholder_name, Placeholder, Template};
