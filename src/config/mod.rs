pub mod settings;

pub use settings::{BehaviorConfig, Config, ServerConfig, ShellConfig};
