//! Tab Sidebar: core of a browser side panel listing a window's tabs and tab groups.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod host;
pub mod managers;
pub mod rpc_handler;
pub mod services;
pub mod types;
