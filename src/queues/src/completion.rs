// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionError {
    #[error("the completion was dropped without a value")]
    Abandoned,
    #[error("timed out waiting for completion")]
    Timeout,
}

/// Create a connected one-shot pair. The `Completion` side is held by the
/// producer and the `Pending` side by the consumer.
pub fn completion<T>() -> (Completion<T>, Pending<T>) {
    let (sender, receiver) = bounded(1);
    (
        Completion { sender },
        Pending {
            receiver,
            done: false,
        },
    )
}

/// The producing half of a one-shot completion. Completing consumes it, so a
/// value can be delivered at most once.
#[derive(Debug)]
pub struct Completion<T> {
    sender: Sender<T>,
}

impl<T> Completion<T> {
    /// Deliver the value. If the `Pending` side has already been dropped the
    /// value is handed back in the error.
    pub fn complete(self, value: T) -> Result<(), T> {
        self.sender.try_send(value).map_err(|e| e.into_inner())
    }
}

/// The consuming half of a one-shot completion.
#[derive(Debug)]
pub struct Pending<T> {
    receiver: Receiver<T>,
    done: bool,
}

impl<T> Pending<T> {
    /// Block until the value arrives.
    pub fn wait(self) -> Result<T, CompletionError> {
        self.receiver
            .recv()
            .map_err(|_| CompletionError::Abandoned)
    }

    /// Block until the value arrives or the timeout elapses. On timeout the
    /// `Pending` is returned so the caller may keep waiting.
    pub fn wait_timeout(self, timeout: Duration) -> Result<T, (Self, CompletionError)> {
        match self.receiver.recv_timeout(timeout) {
            Ok(value) => Ok(value),
            Err(RecvTimeoutError::Timeout) => Err((self, CompletionError::Timeout)),
            Err(RecvTimeoutError::Disconnected) => Err((self, CompletionError::Abandoned)),
        }
    }

    /// Check for the value without blocking. Returns `Ok(None)` if the value
    /// has not arrived yet.
    pub fn try_take(&mut self) -> Result<Option<T>, CompletionError> {
        if self.done {
            return Err(CompletionError::Abandoned);
        }

        match self.receiver.try_recv() {
            Ok(value) => {
                self.done = true;
                Ok(Some(value))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                Err(CompletionError::Abandoned)
            }
        }
    }
}
