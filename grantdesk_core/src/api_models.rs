mod error_reason;
mod health;
mod roles;

pub use error_reason::*;
pub use health::*;
pub use roles::*;
