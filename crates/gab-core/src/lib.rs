pub mod error;
pub mod speaker;
pub mod types;

pub use error::GabError;
pub use speaker::*;
pub use types::*;
