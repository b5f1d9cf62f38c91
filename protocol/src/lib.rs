//! Types shared between the chat core and anything that speaks its wire
//! contract: opaque identifiers, message records, and the outbound request
//! body.

mod id;
mod message;
mod wire;

pub use id::MessageId;
pub use id::SessionId;
pub use message::Message;
pub use message::Role;
pub use wire::ChatRequest;
