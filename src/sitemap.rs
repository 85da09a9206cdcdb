pub mod server;
pub mod xml;
