pub mod config;
pub mod error;
pub mod identity;
pub mod types;

pub use config::EcobotConfig;
pub use error::{AuthError, EcobotError, Result};
pub use identity::{IdentityProvider, InMemoryIdentityProvider};
pub use types::*;
