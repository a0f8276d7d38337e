//! Trait seams toward the host firmware.
//!
//! The host's config loader, command parser, and console primitives stay
//! opaque behind these traits; the pipeline only ever sees already-parsed
//! values and string sinks. Command abort is deliberately not a sink method:
//! it surfaces as [`MacroLogError::CommandAbort`] propagating out of the
//! invoked handler, which halts that command and nothing else.
//!
//! [`MacroLogError::CommandAbort`]: crate::core::error::MacroLogError::CommandAbort

use crate::core::error::Result;

/// Startup configuration provider.
pub trait ConfigSource {
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn get_str(&self, key: &str, default: &str) -> String;
}

/// Accessor over one command invocation's parsed key/value arguments.
pub trait CommandArgs {
    fn get(&self, key: &str) -> Option<&str>;
    fn get_int(&self, key: &str, default: i64) -> Result<i64>;
}

/// Operator-facing response channels, invoked synchronously in the
/// producer's context.
pub trait HostConsole {
    /// Plain console response.
    fn respond(&mut self, text: &str);

    /// Error-style console response, visually distinct from `respond`.
    fn respond_error(&mut self, text: &str);

    /// Run a synthetic command on the host's command channel
    /// (used for `SET_DISPLAY_TEXT`).
    fn run_command(&mut self, command: &str);
}
