//! Group fan-out for chat traffic and unread notifications, plus the websocket endpoints that
//! subscribe to it.

mod channels;
mod event;
pub mod socket;

pub use channels::{chat_group, user_group, ChannelLayer};
pub use event::{ClientFrame, Event, NotificationFrame};
pub use socket::realtime_router;

/// Close code for a missing session or a non-member.
pub const CLOSE_UNAUTHORIZED: u16 = 4001;
/// Close code for an unknown conversation.
pub const CLOSE_NOT_FOUND: u16 = 4002;
