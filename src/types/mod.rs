pub mod errors;
pub mod payload;
pub mod status;

pub use errors::*;
pub use payload::*;
pub use status::*;
