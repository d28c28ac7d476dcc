// Tab sidebar state managers
// Managers hold per-window state: MRU history in the background, selection and drag state in the panel.

pub mod drag_manager;
pub mod history_manager;
pub mod panel_state;
pub mod selection_manager;
