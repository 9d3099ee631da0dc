pub mod draw;
pub mod grouping;
pub mod naming;
pub mod roster;
pub mod shuffle;

pub use crate::domain::model::{DrawMode, DrawWinner, Group, Participant};
pub use crate::domain::ports::{ConfigProvider, NameGenerator, RosterStore, Storage};
pub use crate::utils::error::Result;
