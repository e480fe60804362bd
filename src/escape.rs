// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Decoding of quoted PO string literals.

/// Decode a quoted PO string literal into raw bytes.
///
/// The `segment` must include the surrounding double quotes. The
/// escapes `\\`, `\"`, `\n` and `\t` are recognized. A backslash
/// followed by any other byte is kept as is, backslash included.
///
/// Decoding never fails: if the segment is not a well-formed literal,
/// the original bytes are returned unchanged.
///
/// # Examples
///
/// ```
/// use po_compiler::escape::decode;
///
/// assert_eq!(decode(br#""Hello\nWorld""#), b"Hello\nWorld");
/// assert_eq!(decode(br#""say \"hi\"""#), b"say \"hi\"");
/// // Not a literal, returned as is.
/// assert_eq!(decode(b"Hello"), b"Hello");
/// ```
pub fn decode(segment: &[u8]) -> Vec<u8> {
    match try_decode(segment) {
        Some(decoded) => decoded,
        None => {
            tracing::debug!(
                "Could not decode {:?}, keeping raw bytes",
                String::from_utf8_lossy(segment)
            );
            segment.to_vec()
        }
    }
}

/// Decode `segment`, returning `None` on any malformed input.
fn try_decode(segment: &[u8]) -> Option<Vec<u8>> {
    let inner = segment.strip_prefix(b"\"")?.strip_suffix(b"\"")?;

    let mut decoded = Vec::with_capacity(inner.len());
    let mut bytes = inner.iter();
    while let Some(&byte) = bytes.next() {
        match byte {
            b'\\' => match *bytes.next()? {
                b'\\' => decoded.push(b'\\'),
                b'"' => decoded.push(b'"'),
                b'n' => decoded.push(b'\n'),
                b't' => decoded.push(b'\t'),
                other => decoded.extend_from_slice(&[b'\\', other]),
            },
            // An unescaped quote ends the literal early.
            b'"' => return None,
            _ => decoded.push(byte),
        }
    }
    Some(decoded)
}
