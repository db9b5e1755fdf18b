pub mod assistants;
pub mod threads;
