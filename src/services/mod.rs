// Tab sidebar services
// Services provide the stateless pieces: snapshot building, command dispatch, search, settings, localization.

pub mod color_picker;
pub mod command_dispatcher;
pub mod localization_engine;
pub mod search_filter;
pub mod settings_engine;
pub mod snapshot_builder;
