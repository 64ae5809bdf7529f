// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Inter-thread communication primitives.
//!
//! A `completion()` pair hands exactly one value from the thread which owns
//! a connection (and decodes its responses) to the thread which issued the
//! request and is waiting for the outcome.

mod completion;

pub use completion::{completion, Completion, CompletionError, Pending};
