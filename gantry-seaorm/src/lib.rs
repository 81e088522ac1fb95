//! # Gantry SeaORM
//!
//! SeaORM database integration for the Gantry request lifecycle.
//!
//! The centerpiece is the [`TransactionPlugin`]: it opens a connection
//! pool at application startup, begins a transaction before each request,
//! commits on the normal edge and rolls back on the exception edge. The
//! action reaches the open transaction through [`TransactionAccess`] and
//! may finish it early; the plugin treats that as benign.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gantry_core::App;
//! use gantry_seaorm::TransactionPlugin;
//!
//! let mut app = App::from_env()?;
//! app.register_plugin(TransactionPlugin::from_app_config(&app.config())?);
//! app.start().await?;
//! ```

mod config;
mod database;
mod error;
mod plugin;
mod transaction;

pub use config::*;
pub use database::*;
pub use error::*;
pub use plugin::*;
pub use transaction::*;

// Re-export sea-orm for convenience
pub use sea_orm;
