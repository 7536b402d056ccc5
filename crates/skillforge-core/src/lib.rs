//! skillforge core: training-plan generation, parsing and enrichment.
//!
//! The pipeline: a [`generate::Generator`] turns a [`model::WorkerProfile`]
//! into a Markdown plan following the `## Week N: Title` convention; the
//! [`enrich::Enricher`] rewrites bare resource mentions in that Markdown
//! into clickable links (catalog match, then web search, then synthesized
//! content); [`plan::parser`] turns the Markdown into structured
//! [`model::Week`] records for display and persistence.
//!
//! Every service boundary (generation, web search, storage) is a trait so
//! the core runs in tests without network or database access.

pub mod catalog;
pub mod enrich;
pub mod eval;
pub mod generate;
pub mod model;
pub mod plan;
pub mod search;
pub mod synth;
