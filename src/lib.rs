pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

pub use adapters::{ChainRestClient, HttpDataSource, IpfsUploader, LocalStorage};
pub use config::Cli;
pub use core::engine::RunEngine;
pub use core::pipeline::UpdatePipeline;
pub use core::scheduler::FixedScheduler;
pub use render::TokenImageRenderer;
pub use utils::error::{LiveNftError, Result};
