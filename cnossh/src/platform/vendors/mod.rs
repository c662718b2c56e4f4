//! Built-in device families.

pub mod cnos;
