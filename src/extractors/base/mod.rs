// Generic extraction engine
//
// Language-independent: identity cache, per-unit context, dispatcher,
// populator contract, facts and diagnostics. A language plugs in through
// `entity::Schema`.
//
// - types.rs: handles, node keys, categories, roles, spans
// - cache.rs: reserve-before-populate identity cache
// - context.rs: per-unit state and the file entity
// - dispatch.rs: classification and the lookup-or-populate step
// - entity.rs: schema traits, entity drafts, population outcomes
// - creation_methods.rs: fact helpers shared by populators
// - tree_methods.rs: tree navigation helpers

pub mod cache;
pub mod context;
pub mod creation_methods;
pub mod diagnostics;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod facts;
pub mod oracle;
pub mod tree_methods;
pub mod types;

pub use cache::{IdentityCache, SlotState};
pub use context::{Context, UnitReport};
pub use diagnostics::{Diagnostic, Diagnostics, Severity, Subject};
pub use entity::{Entity, EntityInfo, KindTag, Outcome, Owner, Schema};
pub use error::{ExtractionError, FatalError, ResolutionError};
pub use facts::{Fact, FactSink, MemorySink, Relation, Value};
pub use oracle::SemanticOracle;
pub use types::{Category, Handle, NodeKey, Role, Span, UnitId};
