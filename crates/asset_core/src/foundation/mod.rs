//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and scene transforms
//! - Frame timing
//! - Logging setup

pub mod math;
pub mod time;
pub mod logging;
