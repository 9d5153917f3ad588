//! rleviewer: interactive viewer for large run-length-encoded images.
//!
//! The library half wires the codec, display and input crates into a
//! [`Session`]: open an encoded buffer, then poll input, update pan/zoom and
//! repaint until the exit key. The binary adds argument parsing, logging and
//! an optional PNG snapshot of the final frame.

pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod storage;

pub use app::{LoopState, Session, SessionStats};
pub use args::Args;
pub use config::ViewerConfig;
pub use error::ViewerError;
pub use storage::{FileStorage, MemoryStorage, StorageProvider};
