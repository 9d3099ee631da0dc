// Adapters layer: concrete implementations of the domain ports and the
// import/export formats around them.

pub mod export;
pub mod gemini;
pub mod import;
pub mod storage;
