pub mod analyzer;
pub mod config;
pub mod console;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod logger;
pub mod responder;
pub mod training;
