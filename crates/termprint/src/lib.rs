#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod console;
pub mod detection;
pub mod error;
pub mod logging; // Scheme-colored logger (SchemeLogger)
pub mod renderer;
pub mod report; // Projections and request info
pub mod scheme;
pub mod testing; // Test utilities

pub use crate::config::RenderConfig;
pub use crate::console::{Console, Target};
pub use crate::detection::{
    DisplayContext, is_agent_context, should_enable_rich, should_enable_rich_for,
};
pub use crate::error::{RenderError, RenderResult};
pub use crate::logging::{SchemeLogger, SchemeLoggerBuilder};
pub use crate::renderer::{Renderer, RuleOptions, TableOptions, display_value};
pub use crate::report::{Projection, RequestInfo};
pub use crate::scheme::{ColorScheme, Role, SchemeName, SchemePolicy, parse_style};
pub use rich_rust;
