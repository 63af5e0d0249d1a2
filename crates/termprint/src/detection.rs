//! Agent/human context detection
//!
//! Determines whether styled output should be enabled based on the execution context.

use rich_rust::terminal;

use crate::console::Target;

/// Display context representing the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayContext {
    /// Agent context - plain output for machine parsing
    Agent,
    /// Human context - styled output
    #[default]
    Human,
}

impl DisplayContext {
    /// Create an agent (plain output) context
    #[must_use]
    pub fn new_agent() -> Self {
        Self::Agent
    }

    /// Create a human (styled output) context
    #[must_use]
    pub fn new_human() -> Self {
        Self::Human
    }

    /// Auto-detect the display context from environment
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_for(Target::Stdout)
    }

    /// Auto-detect the display context for a particular stream
    #[must_use]
    pub fn detect_for(target: Target) -> Self {
        if should_enable_rich_for(target) {
            Self::Human
        } else {
            Self::Agent
        }
    }

    /// Check if this is a human context (styled output enabled)
    #[must_use]
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Check if this is an agent context (plain output)
    #[must_use]
    pub fn is_agent(&self) -> bool {
        matches!(self, Self::Agent)
    }
}

/// Determine if we're running in an agent or CI context
#[must_use]
pub fn is_agent_context() -> bool {
    is_agent_context_with(|key| std::env::var(key).ok())
}

/// Determine if styled output should be enabled on stdout
#[must_use]
pub fn should_enable_rich() -> bool {
    should_enable_rich_for(Target::Stdout)
}

/// Determine if styled output should be enabled on the given stream
#[must_use]
pub fn should_enable_rich_for(target: Target) -> bool {
    should_enable_rich_with(|key| std::env::var(key).ok(), || match target {
        Target::Stdout => terminal::is_terminal(),
        Target::Stderr => terminal::is_stderr_terminal(),
    })
}

fn is_agent_context_with(lookup: impl Fn(&str) -> Option<String>) -> bool {
    const INDICATORS: [&str; 4] = ["CI", "AGENT_MODE", "TERMPRINT_PLAIN", "NO_COLOR"];

    INDICATORS.iter().any(|key| lookup(key).is_some())
        || lookup("TERM").is_some_and(|term| term == "dumb")
}

fn should_enable_rich_with(
    lookup: impl Fn(&str) -> Option<String>,
    is_terminal: impl FnOnce() -> bool,
) -> bool {
    // Explicit enable always wins
    if lookup("TERMPRINT_RICH").is_some() {
        return true;
    }

    if is_agent_context_with(&lookup) {
        return false;
    }

    is_terminal()
}
