//! Market domain types
//!
//! Quotes as posted by a book, statistical priors, and the record shapes the
//! external loaders hand over.

mod kind;
mod types;

pub use kind::{LineKind, MarketKind, Side};
pub use types::{PriceField, Prior, PriorRecord, Proposition, Quote, QuoteRecord};
