//! Workspace root crate. Holds only cross-crate integration tests; runtime
//! code lives in `crates/sensor-*` and the binaries in `services/*`.
