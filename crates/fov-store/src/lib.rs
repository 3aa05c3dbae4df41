pub mod config;
pub mod error;
pub mod host;
pub mod paths;
pub mod schema;
pub mod store;

pub use config::{BypassRules, LayerConfig};
pub use error::{Result, StoreError};
pub use host::attach;
pub use store::SettingsDb;
