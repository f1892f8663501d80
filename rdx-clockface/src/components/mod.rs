//! Contains the building blocks of the clock face.
//!
//! This module provides the shadowed element pairs, the rotating stats slot
//! and the root `Watch` that ties them to host events. The
//! `FaceEngine` owns a `Watch` and feeds it one event at a time.

pub mod shadowed;
pub mod stats;
pub mod watch;
