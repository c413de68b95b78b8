pub mod analysis_state;
pub mod coinbase;
pub mod monitor;
pub mod notifier;
