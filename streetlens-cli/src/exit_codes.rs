//! Exit codes following sysexits.h conventions.

#![allow(dead_code)]

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all, including a no-match answer from the backend).
pub const GENERAL_ERROR: i32 = 1;

/// Command line usage error (missing or inconsistent flags, including a
/// submission attempted without a location).
pub const USAGE_ERROR: i32 = 64;

/// Cannot open or use the input photo.
pub const INPUT_ERROR: i32 = 66;

/// Matching service unreachable.
pub const NETWORK_ERROR: i32 = 69;
