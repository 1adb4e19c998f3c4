pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    ActionSettings, ArtifactSettings, BrowserConfig, BrowserKind, HarnessConfig, ResolverSettings,
};
