// sensor-simulator: synthetic scalar and spectral reading generators plus
// the TCP publisher loop used for development and acceptance testing. The
// physical chamber/shaking-rig models a real device would have are out of
// scope; these generators are a simplified stand-in sufficient to drive the
// alarm engine's scalar and FTIR paths.

pub mod generator;
pub mod publisher;

pub use generator::{ScalarGenerator, SpectralGenerator};
pub use publisher::{Publisher, PublisherConfig};
