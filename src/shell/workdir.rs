use std::io;
use std::path::{Path, PathBuf};

/// Get the invoking user's home directory
pub fn home_dir() -> io::Result<PathBuf> {
    let home = std::env::var("HOME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "HOME environment variable not set",
        )
    })?;

    Ok(PathBuf::from(home))
}

/// Extract the target of a directory-change command
///
/// Returns `Some` when the command is `cd` (optionally followed by an
/// argument), `None` for everything else. A bare `cd` yields an empty
/// target, which resolves to the home directory.
pub fn cd_target(command: &str) -> Option<&str> {
    let trimmed = command.trim();

    if trimmed == "cd" {
        return Some("");
    }

    let rest = trimmed.strip_prefix("cd")?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        // Token merely starts with "cd" (e.g. "cdrecord")
        None
    }
}

/// Resolve a `cd` target against the current working directory
///
/// Mirrors what the spawned shell does with the same argument: no argument
/// or `~` goes home, `/` is the filesystem root, absolute paths are taken
/// as-is, everything else is relative to the current directory.
pub fn resolve_cd_target(target: &str, current: &Path, home: &Path) -> PathBuf {
    match target {
        "" | "~" => home.to_path_buf(),
        "/" => PathBuf::from("/"),
        t if t.starts_with('/') => PathBuf::from(t),
        t => current.join(t),
    }
}
