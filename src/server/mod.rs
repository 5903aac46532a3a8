pub mod acceptor;
pub mod handler;
pub mod listener;

pub use acceptor::{ShutdownHandle, SinkServer};
