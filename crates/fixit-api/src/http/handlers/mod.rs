pub mod message;
pub mod ws;
