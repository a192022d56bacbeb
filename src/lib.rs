//! Ingestion and projection core of the PMO dashboard.
//!
//! Raw CSV text flows through [`tokenizer`], [`headers`], [`normalize`] and [`builder`]
//! into a collection of [`task::Task`]s. [`project`] rolls tasks up per project and
//! [`schedule`] computes Gantt geometry. [`source`] and [`dashboard`] load and hold the
//! collection; everything else is a pure function of it.

pub mod builder;
pub mod config;
pub mod dashboard;
pub mod fields;
pub mod filter;
pub mod headers;
pub mod normalize;
pub mod project;
pub mod risk;
pub mod schedule;
pub mod source;
pub mod summary;
pub mod task;
pub mod tokenizer;
