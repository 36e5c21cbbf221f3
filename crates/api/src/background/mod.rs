//! Background tasks spawned at startup.

pub mod publish_sweep;
