// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Component configurations for the memcache binary client. Each component
//! is a serde struct with defaults for every field, plus an accessor trait so
//! that consumers can take any top-level config which contains it.

#[macro_use]
extern crate log;

mod binary;
mod client;
mod debug;
mod klog;

pub use binary::{Binary, BinaryConfig};
pub use client::ClientConfig;
pub use debug::{Debug, DebugConfig, Level};
pub use klog::{Klog, KlogConfig};
