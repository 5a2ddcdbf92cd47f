pub mod message;
pub mod view;
