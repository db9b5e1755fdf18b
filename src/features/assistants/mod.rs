//! Assistant management feature.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/assistants` | Create an assistant |
//! | GET | `/assistants/{id}` | Retrieve an assistant |
//! | PUT | `/assistants/{id}` | Partially update an assistant |
//! | DELETE | `/assistants/{id}` | Delete an assistant |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::AssistantService;
