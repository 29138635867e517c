pub mod analysis;
pub mod pdf_processor;
pub mod pipeline;
pub mod upload;

pub use analysis::*;
pub use pdf_processor::*;
pub use upload::*;
