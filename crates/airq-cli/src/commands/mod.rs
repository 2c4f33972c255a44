//! Command implementations for the CLI.

mod cleanup;
mod config;
mod favorite;
mod history;
mod preference;
mod reading;
mod seed;
mod settings;
mod stats;

pub use cleanup::cmd_cleanup;
pub use config::cmd_config;
pub use favorite::cmd_favorite;
pub use history::cmd_history;
pub use preference::cmd_preference;
pub use reading::cmd_reading;
pub use seed::cmd_seed;
pub use settings::{cmd_theme, cmd_threshold};
pub use stats::cmd_stats;
