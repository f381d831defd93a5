//! Terminal detection

use std::io::IsTerminal;

/// CI systems that do not set `CI` themselves
const CI_VARS: [&str; 5] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "CODEBUILD_BUILD_ID",
];

/// Decides between styled and plain status output
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    fancy: bool,
}

impl UiContext {
    /// Styled output when stderr is a terminal outside CI
    pub fn detect() -> Self {
        let in_ci = CI_VARS.iter().any(|var| std::env::var_os(var).is_some());
        Self {
            fancy: std::io::stderr().is_terminal() && !in_ci,
        }
    }

    /// Plain output regardless of environment
    pub fn plain() -> Self {
        Self { fancy: false }
    }

    pub fn use_fancy_output(&self) -> bool {
        self.fancy
    }
}
