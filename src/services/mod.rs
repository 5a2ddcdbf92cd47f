pub mod message_service;
pub mod view_log;
