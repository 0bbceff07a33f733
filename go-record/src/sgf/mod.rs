pub mod coord;
mod error;
mod parser;
pub mod reader;
mod serialize;
pub mod types;
pub mod variation;
pub mod writer;

pub use error::SgfError;
pub use parser::parse;
pub use reader::{LoadReport, replay_record};
pub use serialize::{format_real, serialize};
pub use types::*;
pub use variation::{BranchSource, embed_branches};
pub use writer::snapshot;
