pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::gemini::{GeminiNameGenerator, GeminiSettings};
pub use crate::adapters::storage::{FileRosterStore, LocalStorage};
pub use crate::app::toolbox::Toolbox;
pub use crate::config::ToolboxConfig;
pub use crate::core::draw::{DrawEngine, RevealTiming};
pub use crate::core::grouping::GroupingEngine;
pub use crate::domain::model::{DrawMode, DrawWinner, Group, Participant};
pub use crate::utils::error::{Result, ToolboxError};
