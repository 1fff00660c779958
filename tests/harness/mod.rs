// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for contact relay abuse simulation.
//!
//! This module provides utilities for replaying abusive submission patterns
//! against the submission policy on a simulated clock.

pub mod attacks;
pub mod generators;
pub mod metrics;
