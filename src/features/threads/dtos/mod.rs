mod attachment_dto;
mod message_dto;
mod thread_dto;

pub use attachment_dto::*;
pub use message_dto::*;
pub use thread_dto::*;
