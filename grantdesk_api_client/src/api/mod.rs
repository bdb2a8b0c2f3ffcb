mod health;
mod roles;

pub use health::*;
pub use roles::*;
