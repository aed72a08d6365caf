#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(clippy::pedantic)]
#![allow(clippy::multiple_crate_versions, clippy::missing_errors_doc)]

pub mod client;
pub mod config;
pub mod models;
pub mod navigation;
pub mod program;
pub mod roster;
pub mod selection;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
