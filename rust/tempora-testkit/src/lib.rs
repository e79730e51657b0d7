//! Test collaborators for the Tempora crates.
//!
//! The arithmetic crate leaves time-zone rules and locale text to the caller.
//! This crate provides deterministic stand-ins for both, together with seeded
//! instant sweeps for property-style tests:
//! - [`zone::DstZone`], a zone with an explicit transition list
//! - [`symbols::EnglishSymbols`], English month, day, era and halfday names
//! - [`sweep`], reproducible pseudo-random instants and dates
//! - [`lunisolar::sample_table`], a small lunisolar month table

pub mod lunisolar;
pub mod sweep;
pub mod symbols;
pub mod zone;
