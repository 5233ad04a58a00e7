pub mod validator;

pub use validator::{CommandValidator, ValidationError};

/// Blocklist of command names that are never executed
///
/// Matching is against the first whitespace-delimited token of the command,
/// exact and case-insensitive. The list is deliberately small: only
/// destructive system-level operations are blocked; everything else is
/// permitted for local single-user use.
///
/// Declaration order is the order reported by `GET /api/dangerous-commands`.
pub const DANGEROUS_COMMANDS: &[&str] = &[
    // Power control
    "reboot",
    "shutdown",
    "halt",
    "poweroff",
    // Raw disk writes
    "dd",
    "fdisk",
    "mkfs",
    "wipefs",
    // Secure erase
    "shred",
];
