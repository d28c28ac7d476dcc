// Tab sidebar shared type definitions
// Each submodule defines types used across the background coordinator and the panel.

pub mod command;
pub mod errors;
pub mod event;
pub mod group;
pub mod settings;
pub mod snapshot;
pub mod tab;
