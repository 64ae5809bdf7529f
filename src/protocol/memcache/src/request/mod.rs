// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::borrow::Cow;
use std::fmt::Display;
use std::fmt::Formatter;

mod store;

pub use store::StoreCommand;

// response codes for klog
const STORED: u8 = 5;
const EXISTS: u8 = 6;
const NOT_FOUND: u8 = 8;
const NOT_STORED: u8 = 9;

fn string_key(key: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(key)
}

/// The store commands. They share a request layout (flags and expiration
/// extras, key, value) and all expect an empty-bodied response.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Command {
    Add,
    Replace,
    Set,
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Command::Add => write!(f, "add"),
            Command::Replace => write!(f, "replace"),
            Command::Set => write!(f, "set"),
        }
    }
}
