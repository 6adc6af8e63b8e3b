//! Quaver Library
//!
//! The library layer of the Quaver music engine: an incremental filesystem
//! scanner that reconciles registered root directories against the metadata
//! store, and a browse view that builds the artist → album → track hierarchy
//! from it.
//!
//! # Example
//!
//! ```rust,no_run
//! use quaver_library::{Browser, Scanner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = quaver_storage::create_pool("sqlite://quaver.db").await?;
//! quaver_storage::run_migrations(&pool).await?;
//!
//! quaver_storage::directories::add(&pool, "/home/user/music").await?;
//!
//! let scanner = Scanner::new(pool.clone());
//! let stats = scanner.full_scan().await?;
//! println!("added {} files", stats.added);
//!
//! let mut browser = Browser::new(pool);
//! browser.init_artists().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod browser;
mod error;
mod scanner;

pub use browser::Browser;
pub use error::{LibraryError, Result};
pub use scanner::{ScanStats, Scanner};
