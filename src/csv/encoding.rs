use encoding_rs::{UTF_8, WINDOWS_1251};
use std::borrow::Cow;
use strum_macros::Display;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A character encoding accepted for CSV input.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Encoding {
    #[strum(serialize = "UTF-8")]
    Utf8,
    #[strum(serialize = "Windows-1251")]
    Windows1251,
    #[strum(serialize = "Latin-1")]
    Latin1,
}

impl Encoding {
    /// Encodings in the order they are tried.
    pub const ATTEMPTS: [Self; 3] = [Self::Utf8, Self::Windows1251, Self::Latin1];

    /// Decodes `bytes` strictly, returning `None` on any malformed or
    /// unmappable sequence.
    #[must_use]
    pub fn try_decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Self::Utf8 => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
            }
            Self::Windows1251 => {
                WINDOWS_1251.decode_without_bom_handling_and_without_replacement(bytes)
            }
            Self::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
        }
    }
}

/// Text decoded from raw input, tagged with the encoding that accepted it.
#[derive(Debug)]
pub struct Decoded<'a> {
    pub text: Cow<'a, str>,
    pub encoding: Encoding,
}

/// Decodes `bytes` with the first encoding in [`Encoding::ATTEMPTS`] that
/// accepts them.
#[must_use]
pub fn decode(bytes: &[u8]) -> Option<Decoded<'_>> {
    Encoding::ATTEMPTS.iter().find_map(|&encoding| {
        encoding
            .try_decode(bytes)
            .map(|text| Decoded { text, encoding })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_wins_when_valid() {
        let decoded = decode("Привет, мир".as_bytes()).unwrap();
        assert_eq!(decoded.encoding, Encoding::Utf8);
        assert_eq!(decoded.text, "Привет, мир");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let decoded = decode(b"\xEF\xBB\xBFa,b").unwrap();
        assert_eq!(decoded.encoding, Encoding::Utf8);
        assert_eq!(decoded.text, "a,b");
    }

    #[test]
    fn falls_back_to_windows_1251() {
        // "Иван" in Windows-1251
        let decoded = decode(&[0xC8, 0xE2, 0xE0, 0xED]).unwrap();
        assert_eq!(decoded.encoding, Encoding::Windows1251);
        assert_eq!(decoded.text, "Иван");
    }

    #[test]
    fn latin1_accepts_every_byte() {
        let bytes = (0_u8..=255).collect::<Vec<_>>();
        let text = Encoding::Latin1.try_decode(&bytes).unwrap();
        assert_eq!(text.chars().count(), 256);
        assert_eq!(text.chars().nth(0xE9), Some('é'));
    }

    #[test]
    fn attempt_order() {
        assert_eq!(
            Encoding::ATTEMPTS,
            [Encoding::Utf8, Encoding::Windows1251, Encoding::Latin1]
        );
        assert_eq!(Encoding::Windows1251.to_string(), "Windows-1251");
    }
}
