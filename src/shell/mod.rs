pub mod executor;
pub mod workdir;

// Re-export commonly used types
pub use executor::{ExecutionRecord, ShellExecutor};
pub use workdir::{cd_target, home_dir, resolve_cd_target};
