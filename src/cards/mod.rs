//! Card system: definitions and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data (cost, kind, keywords, spell effect)
//! - `CardRegistry`: Card definition lookup and deck building

pub mod definition;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardKind, Keywords, SpellEffect, TargetRule};
pub use registry::{basic, CardRegistry};
