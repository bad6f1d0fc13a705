pub mod event;
pub mod loader;
pub mod settings;

pub use event::{ChartFilter, EventManifest, GauntletEntry, GauntletFile, GauntletSettings, LadderFile};
pub use loader::load_config_file;
pub use settings::AppConfig;
