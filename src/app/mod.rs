pub mod reveal;
pub mod toolbox;
