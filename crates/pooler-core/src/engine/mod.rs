//! # Engine Module
//!
//! The planning core of the pooler. Everything in here is a pure function of the
//! concentration-sorted peptides and the [`config::PoolingConfig`]; nothing touches files or
//! devices, and no state survives between calls.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Volume limits, the three-tier dilution factor table and
//!   their validation
//! - **Partition Search** ([`partition`]) - Finds the boundary between neat and diluted peptides
//! - **Dilution Planning** ([`dilution`]) - Derives water, peptide and pool volumes per peptide
//! - **Rounding** ([`rounding`]) - The single rounding policy shared by both stages
//! - **Progress Monitoring** ([`progress`]) - Optional callbacks for front-ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod dilution;
pub mod error;
pub mod partition;
pub mod progress;
pub mod rounding;
pub(crate) mod validation;
