//! Cloud master key escrow for NoteSafe.
//!
//! Provides password-protected backup of the master key:
//! - One [`CloudKeyRecord`] per user, replace-on-write
//! - [`EscrowStore`] backends: HTTP API ([`api_client::CloudApiClient`])
//!   and in-memory ([`MemoryEscrowStore`])
//! - [`CloudKeyEscrow`]: save, load, exists, password rotation, removal

pub mod api_client;
pub mod config;
pub mod error;
pub mod escrow;
pub mod store;
pub mod types;

pub use config::CloudConfig;
pub use error::{CloudError, CloudResult, EscrowError, EscrowResult};
pub use escrow::CloudKeyEscrow;
pub use store::{EscrowStore, MemoryEscrowStore};
pub use types::*;
