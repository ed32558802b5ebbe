//! Boolean query parsing for case-law search filters.
//!
//! Turns free-text queries with `AND` / `OR` / `NOT` / quoted-phrase
//! operators into a [`ParsedQuery`] usable for literal-match filtering:
//!
//! | Input | must | should | must_not |
//! |-------|------|--------|----------|
//! | `contract AND breach` | contract, breach | | |
//! | `contract NOT fraud` | contract | | fraud |
//! | `"breach of contract" AND damages` | breach of contract, damages | | |
//! | `negligence OR recklessness` | | negligence, recklessness | |
//!
//! Pure text manipulation: no I/O, no allocation beyond the parsed terms.

mod parser;

pub use parser::ParsedQuery;
