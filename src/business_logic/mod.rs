pub mod alert_engine;
pub mod buffer;
pub mod config;
pub mod extrema;
pub mod flag;
pub mod head_and_shoulders;
pub mod triangle;
