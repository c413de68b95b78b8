pub mod alert;
pub mod analysis;
pub mod candle;
pub mod health;
pub mod sample;
