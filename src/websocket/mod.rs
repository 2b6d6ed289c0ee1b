pub mod dispatch;
pub mod handler;
pub mod msg_approve_handler;
pub mod msg_deny_handler;
pub mod msg_join_handler;
pub mod msg_request_handler;
