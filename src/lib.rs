pub mod annotate;
pub mod config;
pub mod error;
pub mod lemma;
pub mod normalize;
pub mod pipeline;
pub mod reduce;
pub mod table;

pub use error::{Error, Result};
