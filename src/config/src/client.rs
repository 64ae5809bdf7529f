// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::*;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ClientConfig {
    #[serde(default)]
    binary: Binary,
    #[serde(default)]
    debug: Debug,
    #[serde(default)]
    klog: Klog,
}

impl ClientConfig {
    pub fn load(file: &str) -> Result<Self, std::io::Error> {
        let mut file = std::fs::File::open(file)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, std::io::Error> {
        let config: ClientConfig = match toml::from_str(content) {
            Ok(t) => t,
            Err(e) => {
                error!("{}", e);
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "Error parsing config",
                ));
            }
        };

        if config.binary.max_key_len() == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "max_key_len must be greater than zero",
            ));
        }

        Ok(config)
    }
}

impl BinaryConfig for ClientConfig {
    fn binary(&self) -> &Binary {
        &self.binary
    }
}

impl DebugConfig for ClientConfig {
    fn debug(&self) -> &Debug {
        &self.debug
    }
}

impl KlogConfig for ClientConfig {
    fn klog(&self) -> &Klog {
        &self.klog
    }
}
