// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::*;
use crate::binary::response::DecodeContext;
use crate::binary::{BinaryProtocol, ResponseStatus};
use crate::{CachedData, Completion, StoreResult};

/// One in-flight `set`, `add`, or `replace`.
///
/// The command owns everything needed to encode its request and to decode
/// the matching response: the key and encoded value, the resumable decode
/// state, the outcome slot, and the completion used to wake the caller. It is
/// moved (never shared) between the thread issuing it and the thread which
/// owns the connection.
#[derive(Debug)]
pub struct StoreCommand {
    pub(crate) command: Command,
    pub(crate) key: Box<[u8]>,
    pub(crate) data: CachedData,
    pub(crate) exptime: u32,
    pub(crate) cas: Option<u64>,
    pub(crate) noreply: bool,
    pub(crate) protocol: BinaryProtocol,
    pub(crate) context: DecodeContext,
    pub(crate) status: Option<ResponseStatus>,
    pub(crate) pending: Option<StoreResult>,
    pub(crate) outcome: Option<StoreResult>,
    pub(crate) completion: Option<Completion<StoreResult>>,
    pub(crate) finished: bool,
}

impl StoreCommand {
    /// Create a command with the default (protocol maximum) limits. Use
    /// `BinaryProtocol::store` to apply configured limits.
    pub fn new(command: Command, key: &[u8], data: CachedData, exptime: u32) -> Self {
        BinaryProtocol::default().store(command, key, data, exptime)
    }

    pub(crate) fn with_protocol(
        protocol: BinaryProtocol,
        command: Command,
        key: &[u8],
        data: CachedData,
        exptime: u32,
    ) -> Self {
        #[cfg(feature = "metrics")]
        command.counters().issued.increment();

        Self {
            command,
            key: key.to_owned().into_boxed_slice(),
            data,
            exptime,
            cas: None,
            noreply: false,
            context: DecodeContext::new(protocol.max_body_len()),
            protocol,
            status: None,
            pending: None,
            outcome: None,
            completion: None,
            finished: false,
        }
    }

    /// Attach a compare-and-swap token. It is carried with the command but
    /// the binary store encoder never sends it.
    pub fn with_cas(mut self, cas: u64) -> Self {
        self.cas = Some(cas);
        self
    }

    pub fn with_noreply(mut self, noreply: bool) -> Self {
        self.noreply = noreply;
        self
    }

    /// Attach the completion which will receive the outcome.
    pub fn with_completion(mut self, completion: Completion<StoreResult>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        self.data.data()
    }

    pub fn flags(&self) -> u32 {
        self.data.flag()
    }

    pub fn exptime(&self) -> u32 {
        self.exptime
    }

    pub fn cas(&self) -> Option<u64> {
        self.cas
    }

    pub fn noreply(&self) -> bool {
        self.noreply
    }

    /// The status from the response header, once it has been read.
    pub fn status(&self) -> Option<ResponseStatus> {
        self.status
    }

    /// The outcome, once the whole response has been consumed or decoding has
    /// failed.
    pub fn outcome(&self) -> Option<&StoreResult> {
        self.outcome.as_ref()
    }

    /// Returns true once the outcome has been delivered.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Record the outcome and wake the caller. Only the first call has any
    /// effect.
    pub(crate) fn deliver(&mut self, outcome: StoreResult) {
        if self.finished {
            debug!("{} outcome already delivered, ignoring {:?}", self.command, outcome);
            return;
        }
        self.finished = true;

        #[cfg(feature = "metrics")]
        {
            let counters = self.command.counters();
            match outcome {
                Ok(true) => counters.stored.increment(),
                Ok(false) => counters.not_stored.increment(),
                Err(_) => counters.ex.increment(),
            };
        }

        self.klog(&outcome);

        self.outcome = Some(outcome.clone());

        if let Some(completion) = self.completion.take() {
            if completion.complete(outcome).is_err() {
                debug!("{} completed after the caller stopped waiting", self.command);
            }
        }
    }

    fn klog(&self, outcome: &StoreResult) {
        let code = match (outcome, self.status) {
            (Ok(true), _) => STORED,
            (Ok(false), Some(ResponseStatus::KeyExists)) => EXISTS,
            (Ok(false), Some(ResponseStatus::KeyNotFound)) => NOT_FOUND,
            (Ok(false), _) => NOT_STORED,
            (Err(_), _) => {
                return;
            }
        };
        klog!(
            "\"{} {} {} {} {}\" {} {}",
            self.command,
            string_key(self.key()),
            self.flags(),
            self.exptime,
            self.value().len(),
            code,
            self.context.response_len()
        );
    }
}

#[cfg(feature = "metrics")]
pub(crate) struct CommandCounters {
    pub(crate) issued: &'static metriken::Counter,
    pub(crate) ex: &'static metriken::Counter,
    pub(crate) stored: &'static metriken::Counter,
    pub(crate) not_stored: &'static metriken::Counter,
}

#[cfg(feature = "metrics")]
impl Command {
    pub(crate) fn counters(&self) -> CommandCounters {
        use crate::*;

        match self {
            Command::Add => CommandCounters {
                issued: &ADD,
                ex: &ADD_EX,
                stored: &ADD_STORED,
                not_stored: &ADD_NOT_STORED,
            },
            Command::Replace => CommandCounters {
                issued: &REPLACE,
                ex: &REPLACE_EX,
                stored: &REPLACE_STORED,
                not_stored: &REPLACE_NOT_STORED,
            },
            Command::Set => CommandCounters {
                issued: &SET,
                ex: &SET_EX,
                stored: &SET_STORED,
                not_stored: &SET_NOT_STORED,
            },
        }
    }
}
