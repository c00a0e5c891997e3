//! Room aggregate - derived per-room summary of the event log

mod room_aggregate;

pub use room_aggregate::{AggregateDelta, RecipientCount, RoomAggregate, RoomSnapshot};
