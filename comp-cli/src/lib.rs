pub mod logging;
pub mod present;
pub mod session;
pub mod settings;

pub use session::{SessionEnd, run_session};
pub use settings::{Settings, SettingsError};
