/// Radio-text message capacity in characters.
pub const RADIO_TEXT_LEN: usize = 64;

/// Characters carried per type-2A group.
pub const SEGMENT_LEN: usize = 4;

/// The radio-text assembly buffer.
///
/// 64 characters addressed in 4-byte segments. The A/B flag transmitted
/// with every segment marks message boundaries: a flip ends the message
/// being assembled.
#[derive(Debug)]
pub struct RadioText {
    buf: [u8; RADIO_TEXT_LEN],
    flag: Option<bool>,
}

impl Default for RadioText {
    fn default() -> Self {
        RadioText {
            buf: [b' '; RADIO_TEXT_LEN],
            flag: None,
        }
    }
}

impl RadioText {
    /// Create an empty buffer.
    pub fn new() -> Self {
        RadioText::default()
    }

    /// Note the A/B flag of an incoming segment. On a flip the assembled
    /// message is returned (trimmed of trailing space, CR and NUL; `None`
    /// when nothing but padding accumulated) and the buffer is cleared.
    pub fn set_flag(&mut self, flag: bool) -> Option<String> {
        let flipped = self.flag.is_some_and(|previous| previous != flag);
        self.flag = Some(flag);
        if !flipped {
            return None;
        }
        let message = self.message();
        self.buf = [b' '; RADIO_TEXT_LEN];
        message
    }

    /// Write one 4-character segment at the given index (0-15).
    pub fn write_segment(&mut self, index: usize, chars: &[u8; SEGMENT_LEN]) {
        let start = index * SEGMENT_LEN;
        self.buf[start..start + SEGMENT_LEN].copy_from_slice(chars);
    }

    /// The message assembled so far, trimmed like on a flip.
    pub fn message(&self) -> Option<String> {
        let end = self
            .buf
            .iter()
            .rposition(|&b| b != b' ' && b != b'\r' && b != 0)
            .map_or(0, |pos| pos + 1);
        if end == 0 {
            None
        } else {
            Some(String::from_utf8_lossy(&self.buf[..end]).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_flag_is_not_a_flip() {
        let mut text = RadioText::new();
        assert_eq!(text.set_flag(true), None);
        assert_eq!(text.set_flag(true), None);
    }

    #[test]
    fn flip_emits_and_clears() {
        let mut text = RadioText::new();
        text.set_flag(false);
        text.write_segment(0, b"Now ");
        text.write_segment(1, b"play");
        text.write_segment(2, b"ing\r");
        assert_eq!(text.set_flag(true).as_deref(), Some("Now playing"));
        assert_eq!(text.message(), None);
    }

    #[test]
    fn flip_with_only_padding_emits_nothing() {
        let mut text = RadioText::new();
        text.set_flag(false);
        text.write_segment(3, b"  \r\r");
        assert_eq!(text.set_flag(true), None);
    }

    #[test]
    fn last_segment_stays_in_bounds() {
        let mut text = RadioText::new();
        text.write_segment(15, b"end.");
        let message = text.message().unwrap();
        assert_eq!(message.len(), RADIO_TEXT_LEN);
        assert!(message.ends_with("end."));
    }
}
