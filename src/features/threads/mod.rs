//! Threads, messages and file attachments.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/threads` | Create an empty thread |
//! | POST | `/threads/{id}/messages` | Append a message |
//! | GET | `/threads/{id}/messages` | List messages, oldest first |
//! | POST | `/threads/{id}/files` | Upload a file and reference it from a new message |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::{ThreadAttachmentService, ThreadService};
