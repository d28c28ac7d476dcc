//! App Core for the tab sidebar.
//!
//! `App` is the background coordinator: it owns the host handle, the MRU
//! history, settings and localization, feeds host events into the history
//! and runs panel commands through the dispatcher.

use log::{debug, info};

use crate::host::TabHost;
use crate::managers::history_manager::{HistoryTracker, HistoryTrackerTrait};
use crate::managers::panel_state::PanelState;
use crate::services::color_picker::{ColorPicker, FixedColorPicker, RandomColorPicker};
use crate::services::command_dispatcher::{dispatch, DispatchContext};
use crate::services::localization_engine::{LocalizationEngine, LocalizationEngineTrait};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::snapshot_builder::Placeholders;
use crate::types::command::{Command, CommandOutcome};
use crate::types::errors::{CommandError, SettingsError, StartupError};
use crate::types::event::HostEvent;
use crate::types::settings::PanelSettings;
use crate::types::tab::WindowId;

/// Background coordinator for one browser profile.
pub struct App<H: TabHost> {
    pub host: H,
    pub history: HistoryTracker,
    pub settings_engine: SettingsEngine,
    pub localization_engine: LocalizationEngine,
    colors: Box<dyn ColorPicker>,
    placeholders: Placeholders,
    new_group_title: String,
}

impl<H: TabHost> App<H> {
    /// Creates the coordinator, loading settings from `settings_engine`'s file.
    ///
    /// When no settings file exists the UI language follows `LANG`.
    pub fn new(host: H, mut settings_engine: SettingsEngine) -> Result<Self, StartupError> {
        let config_exists = settings_engine.config_exists();
        settings_engine.load()?;

        let mut localization_engine = LocalizationEngine::new();
        localization_engine.initialize()?;

        let mut app = Self {
            host,
            history: HistoryTracker::new(),
            settings_engine,
            localization_engine,
            colors: Box::new(RandomColorPicker::new()),
            placeholders: Placeholders::default(),
            new_group_title: String::new(),
        };
        app.apply_settings();

        if !config_exists {
            let locale = app.localization_engine.detect_system_locale();
            app.set_setting("general.language", serde_json::Value::String(locale))?;
        }
        info!(
            "Tab sidebar ready (locale {}, history cap {})",
            app.localization_engine.get_locale(),
            app.history.max_entries()
        );
        Ok(app)
    }

    pub fn settings(&self) -> &PanelSettings {
        self.settings_engine.get_settings()
    }

    /// Fresh panel state for `window_id`, configured from the current settings.
    pub fn open_panel(&self, window_id: WindowId) -> PanelState {
        PanelState::from_settings(window_id, self.settings())
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    /// Overrides how new group colors are chosen when a request names none.
    pub fn set_color_picker(&mut self, colors: Box<dyn ColorPicker>) {
        self.colors = colors;
    }

    /// Updates one setting by dot path and applies it immediately.
    pub fn set_setting(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        self.settings_engine.set_value(key, value)?;
        self.apply_settings();
        Ok(())
    }

    /// Restores default settings and applies them.
    pub fn reset_settings(&mut self) {
        self.settings_engine.reset();
        self.apply_settings();
    }

    fn apply_settings(&mut self) {
        let settings = self.settings_engine.get_settings().clone();
        self.history.set_max_entries(settings.history.max_entries);
        self.colors = match settings.groups.default_color {
            Some(color) => Box::new(FixedColorPicker(color)),
            None => Box::new(RandomColorPicker::new()),
        };
        self.set_locale(&settings.general.language);
    }

    /// Switches the UI language and refreshes the placeholder strings.
    fn set_locale(&mut self, locale: &str) {
        if let Err(e) = self.localization_engine.set_locale(locale) {
            debug!("Keeping locale {}: {}", self.localization_engine.get_locale(), e);
        }
        let l10n = &self.localization_engine;
        self.placeholders = Placeholders {
            unnamed_group: l10n.t("groups.unnamed", None),
            untitled_tab: l10n.t("tabs.new_tab", None),
        };
        self.new_group_title = l10n.t("groups.new_group", None);
    }

    /// Feeds a host change notification into the history.
    pub fn handle_event(&mut self, event: &HostEvent) {
        match event {
            HostEvent::TabActivated { tab_id, window_id } => {
                self.history.record_activation(*window_id, *tab_id);
            }
            HostEvent::TabRemoved { tab_id, window_id, .. } => {
                self.history.record_closure(*window_id, *tab_id);
            }
            HostEvent::TabDetached {
                tab_id,
                old_window_id,
                ..
            } => {
                self.history.record_closure(*old_window_id, *tab_id);
            }
            HostEvent::WindowRemoved { window_id } => {
                self.history.discard_window(*window_id);
            }
            _ => {}
        }
    }

    /// Runs one panel command against the host.
    pub async fn dispatch(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        let ctx = DispatchContext {
            history: &mut self.history,
            placeholders: &self.placeholders,
            new_group_title: &self.new_group_title,
            colors: self.colors.as_ref(),
        };
        dispatch(&self.host, ctx, command).await
    }
}
