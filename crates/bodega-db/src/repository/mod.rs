//! # Repositories
//!
//! One repository per aggregate: products, sales (with their lines), and
//! purchase orders (with their lines).
//!
//! ## Conventions
//! - Create inputs are validated with bodega-core's rules before any SQL runs
//! - Multi-row writes (a sale/order plus its lines) happen in one transaction
//! - Deletes are hard deletes; line rows cascade via foreign keys
//! - List operations return full domain values, lines included

pub mod order;
pub mod product;
pub mod sale;
