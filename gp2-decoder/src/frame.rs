//! OSP frame extraction and validation
//!
//! A GP2 line carries one OSP message written as hexadecimal byte tokens:
//!
//! ```text
//! 29/10/2014 20:31:08.942 (0) A0 A2 00 12 33 06 ... 64 E1 01 97 B0 B3
//!                             ^^^^^ ^^^^^ ^^^^^^^^^^^^^^^ ^^^^^ ^^^^^
//!                             head  len   payload         check tail
//! ```
//!
//! Only the bytes between head and tail are decoded. `len` and `check` are
//! big-endian; `len` counts payload bytes only.

use crate::types::Rejection;
use byteorder::{BigEndian, ByteOrder};

/// Start sequence of an OSP message, as written in GP2 lines
pub const HEAD_MARKER: &str = "A0 A2";
/// End sequence of an OSP message, as written in GP2 lines
pub const TAIL_MARKER: &str = "B0 B3";

/// Largest payload defined by the OSP protocol
pub const MAX_PAYLOAD_LEN: usize = 2048;
/// Largest decoded frame: length field, payload and checksum
pub const MAX_FRAME_LEN: usize = 2 + MAX_PAYLOAD_LEN + 2;
/// Smallest decoded frame: length field, one payload byte and checksum
pub const MIN_FRAME_LEN: usize = 5;

/// Mask applied after every checksum addition
pub const CHECKSUM_MASK: u16 = 0x7FFF;

/// OSP checksum: the sum of the payload bytes, kept to 15 bits after each
/// addition
pub fn checksum(payload: &[u8]) -> u16 {
    payload
        .iter()
        .fold(0u16, |sum, &b| (sum + u16::from(b)) & CHECKSUM_MASK)
}

/// Reusable buffer for the bytes decoded from one line
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
    overflowed: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(MAX_FRAME_LEN),
            overflowed: false,
        }
    }

    /// Decoded bytes of the last extraction
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode whitespace separated hex byte tokens into the buffer
    ///
    /// Decoding stops at the first token that is not a hex byte, or when the
    /// buffer holds [`MAX_FRAME_LEN`] bytes and more tokens follow.
    pub fn decode_hex(&mut self, hex: &str) -> usize {
        self.bytes.clear();
        self.overflowed = false;
        for token in hex.split_ascii_whitespace() {
            let Ok(byte) = u8::from_str_radix(token, 16) else {
                break;
            };
            if self.bytes.len() == MAX_FRAME_LEN {
                self.overflowed = true;
                break;
            }
            self.bytes.push(byte);
        }
        self.bytes.len()
    }

    /// Locate the head and tail markers in `text` and decode the bytes
    /// between them
    pub fn extract(&mut self, text: &str) -> Result<usize, Rejection> {
        let body = between_markers(text).ok_or(Rejection::MissingMarkers)?;
        let n = self.decode_hex(body);
        if n < MIN_FRAME_LEN || self.overflowed {
            return Err(Rejection::NoMessageData { bytes: n });
        }
        Ok(n)
    }

    /// Validate the decoded bytes as an OSP frame
    pub fn validate(&self) -> Result<Frame<'_>, Rejection> {
        Frame::parse(&self.bytes)
    }
}

/// Text between the first head marker and the first tail marker after it
fn between_markers(text: &str) -> Option<&str> {
    let head = text.find(HEAD_MARKER)? + HEAD_MARKER.len();
    let tail = text[head..].find(TAIL_MARKER)? + head;
    Some(&text[head..tail])
}

/// A validated OSP frame borrowed from a [`FrameBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    bytes: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Check the length field and checksum of decoded frame bytes
    pub fn parse(bytes: &'a [u8]) -> Result<Self, Rejection> {
        if bytes.len() < MIN_FRAME_LEN {
            return Err(Rejection::NoMessageData { bytes: bytes.len() });
        }
        let declared = usize::from(BigEndian::read_u16(&bytes[..2]));
        if bytes.len() != declared + 4 {
            return Err(Rejection::LengthMismatch {
                declared,
                actual: bytes.len() - 4,
            });
        }

        let frame = Self { bytes };
        let computed = checksum(frame.payload());
        let declared = frame.checksum();
        if computed != declared {
            return Err(Rejection::WrongChecksum { computed, declared });
        }
        Ok(frame)
    }

    /// Payload length from the length field
    pub fn length(&self) -> usize {
        self.bytes.len() - 4
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[2..self.bytes.len() - 2]
    }

    /// Message identifier: the first payload byte
    pub fn mid(&self) -> u8 {
        self.bytes[2]
    }

    /// Checksum carried by the frame
    pub fn checksum(&self) -> u16 {
        BigEndian::read_u16(&self.bytes[self.bytes.len() - 2..])
    }

    /// Output record: length field followed by the payload
    pub fn record(&self) -> &'a [u8] {
        &self.bytes[..self.bytes.len() - 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_LINE: &str = "29/10/2014 20:31:08.942 (0) A0 A2 00 12 33 06 00 00 00 00 00 00 00 19 00 00 00 00 00 00 64 E1 01 97 B0 B3";

    /// Render a payload as a GP2 message body with a correct checksum
    fn gp2_body(payload: &[u8]) -> String {
        let mut bytes = (payload.len() as u16).to_be_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes.extend_from_slice(&checksum(payload).to_be_bytes());
        let hex: Vec<String> = bytes.iter().map(|b| format!("{:02X}", b)).collect();
        format!("(0) A0 A2 {} B0 B3", hex.join(" "))
    }

    #[test]
    fn test_checksum_example() {
        let payload = [
            0x33, 0x06, 0, 0, 0, 0, 0, 0, 0, 0x19, 0, 0, 0, 0, 0, 0, 0x64, 0xE1,
        ];
        assert_eq!(checksum(&payload), 0x0197);
    }

    #[test]
    fn test_checksum_masks_every_step() {
        // 0x7FFF + 1 folds to 0 before the next byte is added
        let mut payload = vec![0xFF; 128];
        payload.push(0x7F);
        payload.push(0x01);
        payload.push(0x05);
        assert_eq!(128 * 0xFF + 0x7F, 0x7FFF);
        assert_eq!(checksum(&payload), 0x0005);
    }

    #[test]
    fn test_extract_example_line() {
        let mut buf = FrameBuffer::new();
        assert_eq!(buf.extract(EXAMPLE_LINE), Ok(22));
        let frame = buf.validate().unwrap();
        assert_eq!(frame.length(), 0x12);
        assert_eq!(frame.mid(), 0x33);
        assert_eq!(frame.checksum(), 0x0197);
        assert_eq!(frame.record().len(), 0x12 + 2);
        assert_eq!(&frame.record()[..3], &[0x00, 0x12, 0x33]);
    }

    #[test]
    fn test_missing_head_or_tail() {
        let mut buf = FrameBuffer::new();
        assert_eq!(
            buf.extract("29/10/2014 20:31:08.942 (0) 00 12 33 B0 B3"),
            Err(Rejection::MissingMarkers)
        );
        assert_eq!(
            buf.extract("29/10/2014 20:31:08.942 (0) A0 A2 00 01 33 00 33"),
            Err(Rejection::MissingMarkers)
        );
        // tail before head does not count
        assert_eq!(
            buf.extract("B0 B3 A0 A2 00 01 33 00 33"),
            Err(Rejection::MissingMarkers)
        );
    }

    #[test]
    fn test_too_few_bytes() {
        let mut buf = FrameBuffer::new();
        assert_eq!(
            buf.extract("A0 A2 00 00 00 00 B0 B3"),
            Err(Rejection::NoMessageData { bytes: 4 })
        );
        assert_eq!(
            buf.extract("A0 A2 B0 B3"),
            Err(Rejection::NoMessageData { bytes: 0 })
        );
    }

    #[test]
    fn test_decode_stops_at_bad_token() {
        let mut buf = FrameBuffer::new();
        assert_eq!(buf.decode_hex("00 01 ZZ 02"), 2);
        assert_eq!(buf.bytes(), &[0x00, 0x01]);
        assert_eq!(buf.decode_hex("01 123 02"), 1);
    }

    #[test]
    fn test_overflow_rejected() {
        let payload = vec![0x01; MAX_PAYLOAD_LEN + 1];
        let mut buf = FrameBuffer::new();
        assert_eq!(
            buf.extract(&gp2_body(&payload)),
            Err(Rejection::NoMessageData {
                bytes: MAX_FRAME_LEN
            })
        );
    }

    #[test]
    fn test_max_payload_accepted() {
        let payload = vec![0x01; MAX_PAYLOAD_LEN];
        let mut buf = FrameBuffer::new();
        assert_eq!(buf.extract(&gp2_body(&payload)), Ok(MAX_FRAME_LEN));
        assert_eq!(buf.validate().unwrap().length(), MAX_PAYLOAD_LEN);
    }

    #[test]
    fn test_length_mismatch() {
        // declared 5 payload bytes, only 3 present
        let mut buf = FrameBuffer::new();
        buf.extract("A0 A2 00 05 02 01 01 00 04 B0 B3").unwrap();
        assert_eq!(
            buf.validate(),
            Err(Rejection::LengthMismatch {
                declared: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn test_checksum_off_by_one() {
        let mut buf = FrameBuffer::new();
        buf.extract("A0 A2 00 03 02 01 01 00 05 B0 B3").unwrap();
        assert_eq!(
            buf.validate(),
            Err(Rejection::WrongChecksum {
                computed: 4,
                declared: 5
            })
        );
    }

    #[test]
    fn test_valid_frame_and_single_byte_corruption() {
        let payload: Vec<u8> = (0..40u8).map(|i| i.wrapping_mul(37)).collect();
        let mut buf = FrameBuffer::new();
        buf.extract(&gp2_body(&payload)).unwrap();
        assert_eq!(buf.validate().unwrap().payload(), &payload[..]);

        for i in 0..payload.len() {
            let mut corrupted = buf.bytes().to_vec();
            corrupted[2 + i] ^= 0x01;
            assert!(
                matches!(
                    Frame::parse(&corrupted),
                    Err(Rejection::WrongChecksum { .. })
                ),
                "corruption at payload byte {} not detected",
                i
            );
        }
    }

    #[test]
    fn test_lowercase_hex_bytes() {
        let mut buf = FrameBuffer::new();
        buf.extract("A0 A2 00 01 ff 00 ff B0 B3").unwrap();
        assert_eq!(buf.validate().unwrap().mid(), 0xFF);
    }

    #[test]
    fn test_buffer_reused_between_lines() {
        let mut buf = FrameBuffer::new();
        buf.extract(EXAMPLE_LINE).unwrap();
        buf.extract("A0 A2 00 01 02 00 02 B0 B3").unwrap();
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.validate().unwrap().mid(), 2);
    }
}
