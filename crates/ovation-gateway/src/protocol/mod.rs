//! Wire protocol for the live WebSocket stream

mod messages;

pub use messages::{LiveFrame, RESYNC_CLOSE_CODE};
