// ABOUTME: Shared success envelope for API responses
// ABOUTME: Mirrors the error body so clients can branch on `success`

use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data,
        }
    }
}
