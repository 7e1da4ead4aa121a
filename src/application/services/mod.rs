pub mod pacing;
pub mod safe_send;
pub mod transport;
