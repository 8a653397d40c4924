use serde::Serialize;
use utoipa::ToSchema;

/// Envelope for every storefront response: a short human-readable message
/// plus the payload. Nothing in the shop paginates, so there is no paging
/// block; lists are returned whole.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}
