//! # Sentiment Analytics Engine
//!
//! This crate computes the per-sentiment statistics of a merged trade table:
//! descriptive PnL statistics, profit rate, average position size and the
//! classification-by-side trade counts.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No knowledge of files, paths or rendering. It depends only
//!   on `core-types`.
//! - **Stateless Calculation:** The `AnalyticsEngine` takes a `MergedTable` and
//!   produces a `SentimentAnalysis`. Identical input gives identical output.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the calculation logic.
//! - `SentimentAnalysis`: The grouped results, plus `summary_rows()`.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{DescriptiveStats, SentimentAnalysis, SideDistribution, SummaryRow};
