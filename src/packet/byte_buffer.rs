use super::{
    qname::{Qname, QnameError},
    Input, ParseError, ParseResult,
};

use thiserror::Error;

pub const MAX_DNS_MSG_SIZE: usize = 512;
const MAX_JUMPS: usize = 5;

#[derive(Debug, Error)]
pub enum ByteBufferError {
    #[error("attempt to read out of buffer bounds: {index} >= {buf_len}")]
    BoundError { buf_len: usize, index: usize },
    #[error("jump limit exceeded ({}) during qname unpacking", MAX_JUMPS)]
    JumpLimitExceeded,
    #[error("invalid qname: {0}")]
    Qname(#[from] QnameError),
}

impl<I> From<(I, ByteBufferError)> for ParseError<I> {
    fn from(value: (I, ByteBufferError)) -> Self {
        Self::Buffer(value)
    }
}

/// Immutable view of a whole DNS message, used to read packed qnames by
/// jumping around the buffer. Compression pointers hold offsets relative
/// to the message start, so the view must always cover the full message.
pub struct ByteMessageBuffer<'a> {
    buf: &'a [u8],
}

impl<'a> ByteMessageBuffer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Get a single byte from the buffer with boundary check.
    fn peek_u8(&self, pos: usize) -> Result<u8, ByteBufferError> {
        if pos >= self.buf.len() {
            return Err(ByteBufferError::BoundError {
                buf_len: self.buf.len(),
                index: pos,
            });
        }
        Ok(self.buf[pos])
    }

    /// Get a slice of bytes from the buffer with boundary check.
    fn peek_range(&self, start: usize, len: usize) -> Result<&[u8], ByteBufferError> {
        if start + len > self.buf.len() {
            return Err(ByteBufferError::BoundError {
                buf_len: self.buf.len(),
                index: start + len,
            });
        }
        Ok(&self.buf[start..start + len])
    }

    /// Read a qname starting where the input slice begins.
    ///
    /// Follows compression pointers to collect the fully qualified name.
    /// The returned input is advanced past only the bytes the name
    /// occupies at its own position: a pointer is two bytes wide no
    /// matter how long the pointed-to name is.
    pub fn read_qname(&'a self) -> impl FnMut(Input<'a>) -> ParseResult<'a, Qname> {
        move |i: Input<'a>| {
            let mut pos = self.len() - i.len();
            let mut jumps_performed = 0;
            let mut labels = Vec::new();
            let mut consumed: usize = 0;

            loop {
                // DNS packets are untrusted data, so we need to be paranoid. Someone
                // can craft a packet with a cycle in the jump instructions. This guards
                // against such packets.
                if jumps_performed > MAX_JUMPS {
                    return Err(nom::Err::Failure(ParseError::Buffer((
                        i,
                        ByteBufferError::JumpLimitExceeded,
                    ))));
                }

                // Assume that `pos` is pointing to the start of the qname.
                let len = self
                    .peek_u8(pos)
                    .map_err(|e| nom::Err::Failure(ParseError::Buffer((i, e))))?;

                // If `len` has the two most significant bits set, it represents a
                // jump to some other offset in the packet.
                if (len & 0xC0) == 0xC0 {
                    // The low 6 bits and the next byte form a 14-bit offset
                    // from the start of the message.
                    let b2 = self
                        .peek_u8(pos + 1)
                        .map_err(|e| nom::Err::Failure(ParseError::Buffer((i, e))))?
                        as u16;
                    let offset = (((len & 0x3F) as u16) << 8) | b2;

                    // A pointer is always the final element of a name and is
                    // exactly two bytes wide at the reading position. The
                    // target's bytes never count toward the caller's cursor.
                    if jumps_performed == 0 {
                        consumed += 2;
                    }

                    pos = offset as usize;
                    jumps_performed += 1;

                    continue;
                }

                // Domain names are terminated by an empty label of length 0,
                // so if the length is zero we're done.
                if len == 0 {
                    if jumps_performed == 0 {
                        consumed += 1;
                    }
                    break;
                }

                // Move a single byte forward to move past the length byte.
                pos += 1;

                // Extract the raw bytes for the current label.
                let byte_str = self
                    .peek_range(pos, len as usize)
                    .map_err(|e| nom::Err::Failure(ParseError::Buffer((i, e))))?;
                labels.push(String::from_utf8_lossy(byte_str).into_owned());

                // Move forward for the length of the label.
                pos += len as usize;
                if jumps_performed == 0 {
                    consumed += len as usize + 1;
                }
            }

            Ok((
                &i[consumed..],
                Qname::try_from(labels)
                    .map_err(|e| nom::Err::Failure(ParseError::Qname((i, e))))?,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteBufferError, ByteMessageBuffer};
    use crate::packet::{qname::Qname, ParseError};

    /// 12 filler bytes standing in for a header, then "example.com" at
    /// offset 12, then whatever the test appends.
    fn message_with_name(tail: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; 12];
        data.extend_from_slice(b"\x07example\x03com\x00");
        data.extend_from_slice(tail);
        data
    }

    fn expect_buffer_error(
        result: crate::packet::ParseResult<'_, Qname>,
    ) -> ByteBufferError {
        match result {
            Err(nom::Err::Failure(ParseError::Buffer((_, e)))) => e,
            other => panic!("expected buffer error, got {other:?}"),
        }
    }

    #[test]
    fn reads_uncompressed_name() {
        let data = message_with_name(&[]);
        let buf = ByteMessageBuffer::new(&data);

        let (rest, name) = buf.read_qname()(&data[12..]).unwrap();

        assert_eq!(name, Qname::try_from("example.com").unwrap());
        assert_eq!(rest.len(), 0);
    }

    #[test]
    fn pointer_decodes_like_the_inline_name() {
        let data = message_with_name(&[0xC0, 12]);
        let buf = ByteMessageBuffer::new(&data);

        let (_, inline) = buf.read_qname()(&data[12..]).unwrap();
        let (rest, jumped) = buf.read_qname()(&data[25..]).unwrap();

        assert_eq!(jumped, inline);
        // The pointer occupies exactly two bytes at the reading position.
        assert_eq!(rest.len(), 0);
    }

    #[test]
    fn labels_before_a_pointer_are_kept() {
        let data = message_with_name(&[0x04, b'm', b'a', b'i', b'l', 0xC0, 12]);
        let buf = ByteMessageBuffer::new(&data);

        let (rest, name) = buf.read_qname()(&data[25..]).unwrap();

        assert_eq!(name, Qname::try_from("mail.example.com").unwrap());
        // 5 bytes of label plus the 2-byte pointer.
        assert_eq!(rest.len(), 0);
    }

    #[test]
    fn self_referential_pointer_is_cut_off() {
        let mut data = vec![0u8; 12];
        data.extend_from_slice(&[0xC0, 12]);
        let buf = ByteMessageBuffer::new(&data);

        let err = expect_buffer_error(buf.read_qname()(&data[12..]));
        assert!(matches!(err, ByteBufferError::JumpLimitExceeded));
    }

    #[test]
    fn pointer_past_the_buffer_is_rejected() {
        let mut data = vec![0u8; 12];
        data.extend_from_slice(&[0xC0, 0xFF]);
        let buf = ByteMessageBuffer::new(&data);

        let err = expect_buffer_error(buf.read_qname()(&data[12..]));
        assert!(matches!(err, ByteBufferError::BoundError { .. }));
    }

    #[test]
    fn label_running_past_the_buffer_is_rejected() {
        let mut data = vec![0u8; 12];
        data.extend_from_slice(&[0x05, b'a', b'b']);
        let buf = ByteMessageBuffer::new(&data);

        let err = expect_buffer_error(buf.read_qname()(&data[12..]));
        assert!(matches!(err, ByteBufferError::BoundError { .. }));
    }

    #[test]
    fn label_case_is_preserved() {
        let mut data = vec![0u8; 12];
        data.extend_from_slice(b"\x07ExAmPlE\x03CoM\x00");
        let buf = ByteMessageBuffer::new(&data);

        let (_, name) = buf.read_qname()(&data[12..]).unwrap();
        assert_eq!(name.to_string(), "ExAmPlE.CoM");
    }
}
