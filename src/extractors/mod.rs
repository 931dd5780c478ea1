//! Trapper's Language Extractors Module
//!
//! # Architecture
//!
//! - `base` - language-agnostic engine: identity cache, dispatcher, context,
//!   fact model, diagnostics and the oracle trait
//! - `csharp` - the C# schema (kinds, populators, syntactic oracle)
//! - `factory.rs` - routes a parsed tree to its language schema
//! - `manager.rs` - ExtractorManager public API (parsing, batch runs)

pub mod base;
pub mod csharp;
pub mod factory;
pub mod manager;

pub use factory::{extract_facts, extract_unit};
pub use manager::{BatchSummary, ExtractorManager, UnitFacts, UnitOutcome};
