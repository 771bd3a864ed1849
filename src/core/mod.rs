pub mod bootstrap;
pub mod engine;
pub mod pipeline;
pub mod scheduler;
