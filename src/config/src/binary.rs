// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};

// constants to define default values
const MAX_KEY_LEN: u16 = 250;
const MAX_VALUE_SIZE: u32 = 1024 * 1024;

// helper functions
fn max_key_len() -> u16 {
    MAX_KEY_LEN
}

fn max_value_size() -> u32 {
    MAX_VALUE_SIZE
}

// definitions
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Binary {
    #[serde(default = "max_key_len")]
    max_key_len: u16,
    #[serde(default = "max_value_size")]
    max_value_size: u32,
}

// implementation
impl Binary {
    /// The longest key, in bytes, that will be sent to the server
    pub fn max_key_len(&self) -> u16 {
        self.max_key_len
    }

    /// The largest value, in bytes, that will be sent to the server. Responses
    /// which declare a body larger than the key and value limits combined
    /// are treated as a protocol error.
    pub fn max_value_size(&self) -> u32 {
        self.max_value_size
    }
}

// trait implementations
impl Default for Binary {
    fn default() -> Self {
        Self {
            max_key_len: max_key_len(),
            max_value_size: max_value_size(),
        }
    }
}

// trait definitions
pub trait BinaryConfig {
    fn binary(&self) -> &Binary;
}
