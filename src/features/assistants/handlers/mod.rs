mod assistant_handler;

pub use assistant_handler::*;
