//! Pipeline tests: registers, whole programs, hazards, and branches.

/// Forwarding paths and forwarding/no-forwarding parity.
pub mod forwarding;
