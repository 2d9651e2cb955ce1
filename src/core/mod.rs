//! Core application primitives (scanner, scheduler, HTTP surface)

pub mod http;
pub mod scanner;
pub mod scheduler;

pub use http::*;
pub use scanner::*;
pub use scheduler::*;
