//! # glimpze-entity
//!
//! Domain entity models for Glimpze. Every struct in this crate represents
//! a database row or a domain value object. Flat rows additionally derive
//! `sqlx::FromRow`; aggregates assembled from joins are built by the
//! repositories.

pub mod comment;
pub mod post;
pub mod social;
pub mod tag;
pub mod token;
pub mod user;
