//! bolero-core — vocabulary model, practice statistics, reporting and quizzes.
//!
//! This crate holds the data model and the pure logic of bolero. Storage is
//! reached only through the [`traits::WordRepository`] seam.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod quiz;
pub mod reporting;
pub mod statistics;
pub mod traits;
