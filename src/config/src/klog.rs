// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};

// log to the file path
const FILE: Option<String> = None;

fn file() -> Option<String> {
    FILE
}

/// The command log records one line per completed command.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Klog {
    #[serde(default = "file")]
    file: Option<String>,
}

impl Klog {
    /// Path of the command log. When `None`, command logging is disabled.
    pub fn file(&self) -> Option<String> {
        self.file.clone()
    }
}

impl Default for Klog {
    fn default() -> Self {
        Self { file: file() }
    }
}

pub trait KlogConfig {
    fn klog(&self) -> &Klog;
}
