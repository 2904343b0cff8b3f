pub mod crypto;
pub mod log;
pub mod time;
