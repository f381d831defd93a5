//! Status output for the CLI
//!
//! Resolved values go to stdout so the binary can be used in command
//! substitution. Everything else (status lines, warnings) goes to stderr,
//! styled with `cliclack` on a terminal and as plain tagged lines in CI.

mod context;
mod output;

pub use context::UiContext;
pub use output::{
    remark, step_error_detail, step_info, step_ok, step_ok_detail, step_warn_hint,
};
