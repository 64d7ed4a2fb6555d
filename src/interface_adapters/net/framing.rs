// Newline-delimited framing over a raw byte stream.

use thiserror::Error;

/// Longest line accepted, excluding the terminator.
pub const MAX_LINE_LEN: usize = 4096;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("line exceeds {limit} bytes")]
    TooLong { limit: usize },
    #[error("line is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Accumulates bytes across reads and yields one record per `\n`.
#[derive(Debug)]
pub struct LineBuffer {
    buf: Vec<u8>,
    limit: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_limit(MAX_LINE_LEN)
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit,
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes buffered after the last complete line.
    #[cfg(test)]
    fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Removes and returns the next complete line without its terminator
    /// (`\n` or `\r\n`). `Ok(None)` means more bytes are needed.
    pub fn next_line(&mut self) -> Result<Option<String>, FrameError> {
        let Some(end) = self.buf.iter().position(|&b| b == b'\n') else {
            if self.buf.len() > self.limit {
                return Err(FrameError::TooLong { limit: self.limit });
            }
            return Ok(None);
        };

        let mut line: Vec<u8> = self.buf.drain(..=end).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.len() > self.limit {
            return Err(FrameError::TooLong { limit: self.limit });
        }
        Ok(Some(String::from_utf8(line)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_a_read_holds_several_lines_then_each_is_yielded_in_order() {
        let mut lines = LineBuffer::new();
        lines.extend(b"alice\n(LT)\r\n(F");

        assert_eq!(lines.next_line().expect("frame").as_deref(), Some("alice"));
        assert_eq!(lines.next_line().expect("frame").as_deref(), Some("(LT)"));
        assert_eq!(lines.next_line().expect("frame"), None);
        assert_eq!(lines.pending(), 2);

        lines.extend(b")\n");
        assert_eq!(lines.next_line().expect("frame").as_deref(), Some("(F)"));
        assert_eq!(lines.pending(), 0);
    }

    #[test]
    fn when_line_is_empty_then_it_is_still_a_record() {
        let mut lines = LineBuffer::new();
        lines.extend(b"\n");
        assert_eq!(lines.next_line().expect("frame").as_deref(), Some(""));
    }

    #[test]
    fn when_no_newline_arrives_within_the_limit_then_frame_is_rejected() {
        let mut lines = LineBuffer::with_limit(8);
        lines.extend(b"12345678");
        assert!(matches!(lines.next_line(), Ok(None)));
        lines.extend(b"9");
        assert!(matches!(
            lines.next_line(),
            Err(FrameError::TooLong { limit: 8 })
        ));
    }

    #[test]
    fn when_bytes_are_not_utf8_then_frame_is_rejected() {
        let mut lines = LineBuffer::new();
        lines.extend(&[0xff, 0xfe, b'\n']);
        assert!(matches!(lines.next_line(), Err(FrameError::InvalidUtf8(_))));
    }
}
