pub mod commands;
pub mod consumer_error;
pub mod consumer_state;
pub mod stream_signal;
