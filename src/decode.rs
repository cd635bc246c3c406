//! Pristine-copy content decoding
//!
//! Depending on server and client version, `text-base` copies are stored either
//! gzip-compressed or as plain text. Both are tried, compressed first.

use flate2::bufread::MultiGzDecoder;
use std::io::Read;

/// How a body was decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: Encoding,
}

/// Decode raw bytes into UTF-8 text.
///
/// Returns `None` when the bytes are neither gzip-wrapped UTF-8 nor UTF-8
/// themselves. Never returns partially decoded or lossy text.
pub fn decode(raw: &[u8]) -> Option<Decoded> {
    if let Some(text) = gunzip_utf8(raw) {
        return Some(Decoded {
            text,
            encoding: Encoding::Gzip,
        });
    }

    std::str::from_utf8(raw).ok().map(|text| Decoded {
        text: text.to_string(),
        encoding: Encoding::Plain,
    })
}

/// Decode every gzip member in `raw`. Anything left unconsumed after the
/// last member rejects the whole body.
fn gunzip_utf8(raw: &[u8]) -> Option<String> {
    let mut text = String::new();
    let mut decoder = MultiGzDecoder::new(raw);
    decoder.read_to_string(&mut text).ok()?;
    if !decoder.into_inner().is_empty() {
        return None;
    }
    Some(text)
}
