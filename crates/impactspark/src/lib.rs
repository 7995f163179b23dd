//! ImpactSpark
//!
//! A scholarly impact dashboard over the OpenAlex and Crossref APIs. Search
//! publications, inspect citation patterns, track articles over time and
//! export result sets to reference managers.
//!
//! # Features
//!
//! - **11 dashboard views**: search, details, similarity, citation analytics, impact analysis, export
//! - **Polite clients**: rate limited, retried and cached per the public API etiquette
//! - **Abstract enrichment**: fills missing abstracts from DOI landing pages
//! - **Local by default**: serves `http://127.0.0.1:8501`
//!
//! # Example
//!
//! ```no_run
//! use impactspark::{config::Config, server::DashboardServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = DashboardServer::new(config)?;
//!
//!     server.run_http().await
//! }
//! ```

pub mod analytics;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod results;
pub mod scraping;
pub mod server;
pub mod views;

pub use client::{CrossrefClient, OpenAlexClient};
pub use config::Config;
pub use error::{ClientError, ViewError};
pub use views::ViewContext;
