use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::openai::UpstreamThread;

/// Response DTO for a newly created thread
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThreadResponseDto {
    pub id: String,
    pub created_at: i64,
}

impl From<UpstreamThread> for ThreadResponseDto {
    fn from(thread: UpstreamThread) -> Self {
        Self {
            id: thread.id,
            created_at: thread.created_at,
        }
    }
}
