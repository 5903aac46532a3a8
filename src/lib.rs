// src/lib.rs
pub mod completion;
pub mod config;
pub mod error;
pub mod observer;
pub mod server;

pub use completion::{CompletionGuard, CompletionNotifier, CompletionSet};
pub use error::SinkError;
pub use observer::{ConnObserver, TracingObserver};
pub use server::{ShutdownHandle, SinkServer};
