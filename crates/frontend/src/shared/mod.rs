pub mod api_utils;
pub mod clipboard;
pub mod config;
pub mod events;
pub mod feedback;
pub mod http;
