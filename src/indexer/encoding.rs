//! Charset detection for source files that are not plain UTF-8

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;

/// Decode raw file bytes to text.
///
/// Detection order: byte order mark, then strict UTF-8, then a statistical
/// guess over legacy encodings (Latin-1, Windows-1252, Shift_JIS, ...).
/// Returns the text together with the encoding that produced it.
pub fn decode_source(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text, encoding);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return (Cow::Borrowed(text), UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    (text, encoding)
}
