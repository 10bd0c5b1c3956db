pub mod checkpoint;
pub mod project;
pub mod session;
pub mod status;

pub use checkpoint::*;
pub use project::*;
pub use session::*;
pub use status::*;
