use super::*;

/// Store responses are expected to carry an empty body. A body, if the
/// server sends one, is skipped as a whole by the default `read_value` so
/// the stream stays aligned; its contents are not interpreted.
impl Decode for StoreCommand {
    fn context(&self) -> &DecodeContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut DecodeContext {
        &mut self.context
    }

    fn read_status(&mut self, status: ResponseStatus) {
        self.status = Some(status);

        // held until the body has been consumed
        self.pending = Some(match status {
            ResponseStatus::NoError => Ok(true),
            ResponseStatus::UnknownCommand => Err(StoreError::UnknownCommand),
            _ => Ok(false),
        });

        if self.context.total_body_len() != 0 {
            debug!(
                "{} response with status {:?} has a {} byte body (extras: {} key: {})",
                self.command,
                status,
                self.context.total_body_len(),
                self.context.extras_len(),
                self.context.key_len()
            );
        }
    }

    fn finish(&mut self) -> bool {
        if let Some(outcome) = self.pending.take() {
            self.deliver(outcome);
        }
        true
    }

    fn fail(&mut self, error: &DecodeError) {
        self.pending = None;
        self.deliver(Err(StoreError::Decode(error.clone())));
    }
}
