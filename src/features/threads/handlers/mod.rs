mod attachment_handler;
mod message_handler;
mod thread_handler;

pub use attachment_handler::*;
pub use message_handler::*;
pub use thread_handler::*;
