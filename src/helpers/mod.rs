pub mod config_helper;
pub mod line_buffer;
pub mod validation;
