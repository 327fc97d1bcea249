use crate::models::attendance_session::SessionStatus;
use sea_orm::DbErr;
use thiserror::Error;

/// Caller-facing failure taxonomy for the session and attendance engine.
///
/// Every variant is returned to the caller, never swallowed. `kind()` gives
/// the stable machine-readable discriminator carried in API error responses.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("{0}")]
    Validation(String),

    #[error("valid_from must be earlier than valid_to")]
    InvalidTimeRange,

    #[error("illegal transition from '{from}' to '{to}'")]
    IllegalTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("session is not open for attendance")]
    SessionNotActive,

    #[error("attendance already recorded for this student")]
    AlreadyMarked,

    #[error("reported position is {distance_m:.1}m from the classroom (limit {radius_m:.0}m)")]
    OutOfRange { distance_m: f64, radius_m: f64 },

    #[error("latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinates,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("requester is not permitted to perform this operation")]
    Forbidden,

    #[error("student is not in the session roster")]
    NotInRoster,

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] DbErr),
}

impl AttendanceError {
    pub fn kind(&self) -> &'static str {
        match self {
            AttendanceError::Validation(_) => "validation",
            AttendanceError::InvalidTimeRange => "invalid_time_range",
            AttendanceError::IllegalTransition { .. } => "illegal_transition",
            AttendanceError::SessionNotActive => "session_not_active",
            AttendanceError::AlreadyMarked => "already_marked",
            AttendanceError::OutOfRange { .. } => "out_of_range",
            AttendanceError::InvalidCoordinates => "invalid_coordinates",
            AttendanceError::NotFound(_) => "not_found",
            AttendanceError::Forbidden => "forbidden",
            AttendanceError::NotInRoster => "not_in_roster",
            AttendanceError::StorageUnavailable(_) => "storage_unavailable",
        }
    }
}
