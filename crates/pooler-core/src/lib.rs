//! # Peptide Pooler Core Library
//!
//! Plans how a set of peptides with very different stock concentrations can be pooled
//! into a single mixture on a liquid handler, given the smallest volume the device can
//! pipette, the largest volume that may be drawn from a single stock, and the largest
//! volume the pool may reach.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that the planning logic stays pure and
//! independently testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Peptide`, `PlannedPeptide`,
//!   `Transfer`), the labware layout (tray and dilution-plate well naming) and CSV table I/O.
//!
//! - **[`engine`]: The Logic Core.** Configuration and validation, the partition search that
//!   splits the concentration-sorted peptides into a neat and a diluted group, and the
//!   dilution planner that turns the chosen split into per-peptide volumes.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures: validating and sorting the
//!   input, resolving the boundary (including the fallback when no boundary is feasible),
//!   planning the dilutions and deriving the ordered transfer list for automation.

pub mod core;
pub mod engine;
pub mod workflows;
