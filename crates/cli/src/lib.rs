//! Library half of the `dss` binary: output rendering shared by commands
//! and tests.

pub mod render;
