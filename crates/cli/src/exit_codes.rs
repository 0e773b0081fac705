//! CLI Exit Code Registry
//!
//! Single source of truth for `oxt` exit codes. Exit codes are part of the
//! shell contract — dashboard refresh scripts rely on them.
//!
//! | Code | Description                                   |
//! |------|-----------------------------------------------|
//! | 0    | Success                                       |
//! | 1    | General error (reserved)                      |
//! | 2    | CLI usage error (clap)                        |
//! | 3    | Invalid recon config                          |
//! | 4    | Runtime failure (source unreadable, bad data) |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Config file failed to parse or validate.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 3;

/// Reconciliation could not run: legacy export or live store unreadable.
/// Callers must treat this as "failed to load", never as an empty result.
pub const EXIT_RECON_RUNTIME: u8 = 4;
