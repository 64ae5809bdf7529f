use super::*;

impl BinaryCommand for StoreCommand {
    fn opcode(&self) -> Opcode {
        self.command.into()
    }
}

impl Encode for StoreCommand {
    fn extras_len(&self) -> u8 {
        STORE_EXTRAS_LEN
    }

    fn key_len(&self) -> usize {
        self.key.len()
    }

    fn value_len(&self) -> usize {
        self.data.len()
    }

    fn validate(&self) -> Result<(), EncodeError> {
        if self.key.is_empty() {
            return Err(EncodeError::EmptyKey);
        }

        if self.key.len() > self.protocol.max_key_len() as usize {
            return Err(EncodeError::KeyTooLarge {
                len: self.key.len(),
                max: self.protocol.max_key_len() as usize,
            });
        }

        if self.data.len() > self.protocol.max_value_size() as usize {
            return Err(EncodeError::ValueTooLarge {
                len: self.data.len(),
                max: self.protocol.max_value_size() as usize,
            });
        }

        Ok(())
    }

    fn fill_extras(&self, buffer: &mut dyn BufMut) {
        buffer.put_u32(self.data.flag());
        buffer.put_u32(self.exptime);
    }

    fn fill_key(&self, buffer: &mut dyn BufMut) {
        buffer.put_slice(&self.key);
    }

    fn fill_value(&self, buffer: &mut dyn BufMut) {
        buffer.put_slice(self.data.data());
    }
}
