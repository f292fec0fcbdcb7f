//! Pipelines and batch orchestration for the catalog transcoder.
//!
//! - [`registry`] maps each platform to what it supports.
//! - [`pipeline`] runs one item: import, then convert, validate and export.
//! - [`batch`] runs many items, collecting index-correlated results.
//! - [`fetch`] imports product URLs through a [`Fetcher`] collaborator with
//!   bounded concurrency.
//!
//! # Example
//!
//! ```ignore
//! use catalog_core::{SourceDocument, transcode_batch};
//!
//! let outcome = transcode_batch(&documents, TargetPlatform::Shopify, &import, &export);
//! for (index, err) in &outcome.errors {
//!     eprintln!("item {index}: {err}");
//! }
//! ```

pub mod batch;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod registry;

// === Error Types ===
pub use error::{ParseError, PipelineError, Result};

// === Registry ===
pub use registry::{Capabilities, Registry, registry};

// === Pipelines ===
pub use pipeline::{ExportResult, SourceDocument, export_product, import_document, transcode};

// === Batches ===
pub use batch::{BatchOptions, BatchOutcome, export_batch, import_batch, transcode_batch};
pub use fetch::{FetchFailure, FetchRequest, Fetcher, fetch_and_import};
