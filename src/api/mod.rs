pub mod attendance;
pub mod holiday;
pub mod leave_request;
pub mod overtime;
