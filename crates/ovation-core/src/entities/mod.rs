//! Entities - the append-only reaction event record

mod reaction;

pub use reaction::{NewReaction, ReactionEvent, ReactionKind};
