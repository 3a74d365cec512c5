//! Healing-code catalog and lookup.
//!
//! The catalog is a static text file of `code - meaning` lines grouped under
//! upper-case category headings. Lookups match the issue text against the
//! extracted keywords: exact keyword first, fuzzy similarity second.

pub mod catalog;
pub mod index;

pub use catalog::{Catalog, CatalogError, CodeEntry};
pub use index::{CodeIndex, CodeLookup, HealingCode};
