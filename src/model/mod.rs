pub mod attendance;
pub mod holiday;
pub mod late_rule;
pub mod leave_request;
pub mod role;
pub mod shift;
