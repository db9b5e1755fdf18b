mod assistant_dto;

pub use assistant_dto::*;
