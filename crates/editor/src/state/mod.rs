pub mod scene;
pub mod selection;
pub mod settings;

pub use scene::{node_display_name, short_id, Material, SceneState};
pub use selection::SelectionState;
pub use settings::{EditorSettings, SnapTarget};

/// Combined editor data state: the scene, the selection side-table and
/// the persisted settings. The interaction layer borrows this for the
/// duration of a single event.
pub struct AppState {
    pub scene: SceneState,
    pub selection: SelectionState,
    pub settings: EditorSettings,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            scene: SceneState::default(),
            selection: SelectionState::default(),
            settings: EditorSettings::load(),
        }
    }

    /// Like `new`, but without touching the config dir (tests, harness)
    pub fn with_default_settings() -> Self {
        Self {
            scene: SceneState::default(),
            selection: SelectionState::default(),
            settings: EditorSettings::default(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_default_settings()
    }
}
