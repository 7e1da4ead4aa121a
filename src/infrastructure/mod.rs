pub mod repositories;
pub mod transport;
