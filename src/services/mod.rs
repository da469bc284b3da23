// src/services/mod.rs
pub mod audio;
pub mod generation;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod sanitizer;
pub mod speech;
