//! Value objects - validated primitive wrappers for the domain

mod recipient;
mod room_id;

pub use recipient::Recipient;
pub use room_id::RoomId;
