use serde::Serialize;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// This struct enforces a consistent response structure across all endpoints:
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// - `T` is the type of the `data` payload.
/// - `success` is a boolean indicating operation status.
/// - `message` provides a human-readable context string.
/// - `error_kind` carries the stable failure discriminator on error
///   responses and is omitted on success.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            error_kind: None,
        }
    }

    /// Constructs an error response with a message and default `data`.
    ///
    /// # Requires
    /// - `T` must implement `Default`, since error responses do not include useful data.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
            error_kind: None,
        }
    }

    /// Constructs an error response carrying a machine-readable kind.
    pub fn error_kind(kind: impl Into<String>, message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
            error_kind: Some(kind.into()),
        }
    }

    /// Constructs an error response that still carries a data payload, e.g.
    /// the computed distance on a proximity rejection.
    pub fn error_with_data(
        data: T,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
            error_kind: Some(kind.into()),
        }
    }
}
