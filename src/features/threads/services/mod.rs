mod thread_attachment_service;
mod thread_service;

pub use thread_attachment_service::ThreadAttachmentService;
pub use thread_service::ThreadService;
