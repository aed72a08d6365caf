pub mod completion;
pub mod config;
pub mod program;
pub mod roster;
pub mod session;
