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

//! Writing and reading binary MO files.
//!
//! An MO file starts with seven `u32` header fields: the magic
//! number, the format revision, the number of strings `N`, the
//! offsets of the origin and translation tables, and the size and
//! offset of a hash table. The two tables hold `N` rows of `(length,
//! offset)` pairs pointing at NUL-terminated strings stored after
//! them. The origin table is sorted by key so that lookups can use a
//! binary search. We never write a hash table.

use crate::catalog::Catalog;
use thiserror::Error;

/// Magic number of an MO file, as read in the file's byte order.
pub const MAGIC: u32 = 0x950412de;
/// The magic number of a file written in the other byte order.
const MAGIC_SWAPPED: u32 = 0xde120495;
pub const HEADER_SIZE: usize = 28;
/// Size of one `(length, offset)` table row.
const ROW_SIZE: usize = 8;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Catalog does not fit into an MO file: offset {0} exceeds 32 bits")]
    TooLarge(usize),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoError {
    #[error("File is too short to be an MO file")]
    Truncated,
    #[error("Bad magic number {0:#010x}")]
    BadMagic(u32),
    #[error("Unsupported format revision {0}")]
    UnsupportedRevision(u32),
    #[error("String {index} points outside of the file")]
    OutOfBounds { index: usize },
}

fn to_u32(value: usize) -> Result<u32, EncodeError> {
    u32::try_from(value).map_err(|_| EncodeError::TooLarge(value))
}

/// Encode `catalog` as a little-endian MO file.
///
/// The output only depends on the content of the catalog: encoding
/// the same catalog twice gives identical bytes.
///
/// # Examples
///
/// ```
/// use po_compiler::catalog::Catalog;
/// use po_compiler::mo::encode;
///
/// let catalog = Catalog::from_iter([("Hello", "Salom")]);
/// let mo = encode(&catalog).unwrap();
/// assert_eq!(&mo[..4], &0x950412de_u32.to_le_bytes());
/// assert_eq!(mo.len(), 28 + 16 + "Hello\0Salom\0".len());
/// ```
pub fn encode(catalog: &Catalog) -> Result<Vec<u8>, EncodeError> {
    let count = catalog.len();
    let translation_table_offset = HEADER_SIZE + ROW_SIZE * count;
    let data_offset = translation_table_offset + ROW_SIZE * count;

    // Keys are written first, then values, with a single running
    // offset. The catalog iterates in byte order of the keys.
    let mut cursor = data_offset;
    let mut origin_rows = Vec::with_capacity(count);
    let mut key_block = Vec::new();
    for (msgid, _) in catalog.iter() {
        origin_rows.push((to_u32(msgid.len())?, to_u32(cursor)?));
        key_block.extend_from_slice(msgid);
        key_block.push(b'\0');
        cursor += msgid.len() + 1;
    }

    let mut translation_rows = Vec::with_capacity(count);
    let mut value_block = Vec::new();
    for (_, msgstr) in catalog.iter() {
        translation_rows.push((to_u32(msgstr.len())?, to_u32(cursor)?));
        value_block.extend_from_slice(msgstr);
        value_block.push(b'\0');
        cursor += msgstr.len() + 1;
    }

    let header = [
        MAGIC,
        0, // format revision
        to_u32(count)?,
        to_u32(HEADER_SIZE)?,
        to_u32(translation_table_offset)?,
        0, // hash table size
        0, // hash table offset
    ];

    let mut output = Vec::with_capacity(cursor);
    for field in header {
        output.extend_from_slice(&field.to_le_bytes());
    }
    for (length, offset) in origin_rows.iter().chain(&translation_rows) {
        output.extend_from_slice(&length.to_le_bytes());
        output.extend_from_slice(&offset.to_le_bytes());
    }
    output.extend_from_slice(&key_block);
    output.extend_from_slice(&value_block);
    Ok(output)
}

/// The messages of a decoded MO file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MoFile {
    pub revision: u32,
    /// `(msgid, msgstr)` pairs in table order.
    pub messages: Vec<(Vec<u8>, Vec<u8>)>,
}

impl MoFile {
    /// Decode an MO file written in either byte order.
    ///
    /// Every table row and string is checked to lie within `data`,
    /// including the NUL byte which terminates each string.
    pub fn parse(data: &[u8]) -> Result<Self, MoError> {
        let read_u32: fn([u8; 4]) -> u32 = match read_word(data, 0, u32::from_le_bytes)? {
            MAGIC => u32::from_le_bytes,
            MAGIC_SWAPPED => u32::from_be_bytes,
            magic => return Err(MoError::BadMagic(magic)),
        };
        let field = |index: usize| read_word(data, 4 * index, read_u32).map(|w| w as usize);

        let revision = read_word(data, 4, read_u32)?;
        if revision != 0 {
            return Err(MoError::UnsupportedRevision(revision));
        }
        let count = field(2)?;
        let origin_table_offset = field(3)?;
        let translation_table_offset = field(4)?;

        let messages = (0..count)
            .map(|index| {
                let row = ROW_SIZE * index;
                let msgid = read_string(data, origin_table_offset + row, read_u32, index)?;
                let msgstr = read_string(data, translation_table_offset + row, read_u32, index)?;
                Ok((msgid.to_vec(), msgstr.to_vec()))
            })
            .collect::<Result<Vec<_>, MoError>>()?;

        Ok(Self { revision, messages })
    }

    /// Look up the translation of `msgid`.
    ///
    /// This relies on the messages being sorted by `msgid`, as they are
    /// in files written by [`encode`].
    pub fn get(&self, msgid: &[u8]) -> Option<&[u8]> {
        let index = self
            .messages
            .binary_search_by(|(key, _)| key.as_slice().cmp(msgid))
            .ok()?;
        Some(self.messages[index].1.as_slice())
    }
}

fn read_word(data: &[u8], offset: usize, read_u32: fn([u8; 4]) -> u32) -> Result<u32, MoError> {
    let end = offset.checked_add(4).ok_or(MoError::Truncated)?;
    let bytes = data.get(offset..end).ok_or(MoError::Truncated)?;
    let word: [u8; 4] = bytes.try_into().map_err(|_| MoError::Truncated)?;
    Ok(read_u32(word))
}

/// Read the string described by the table row at `row_offset`.
fn read_string(
    data: &[u8],
    row_offset: usize,
    read_u32: fn([u8; 4]) -> u32,
    index: usize,
) -> Result<&[u8], MoError> {
    let length = read_word(data, row_offset, read_u32)? as usize;
    let offset = read_word(data, row_offset + 4, read_u32)? as usize;
    let end = offset
        .checked_add(length)
        .ok_or(MoError::OutOfBounds { index })?;
    match (data.get(offset..end), data.get(end)) {
        (Some(string), Some(b'\0')) => Ok(string),
        _ => Err(MoError::OutOfBounds { index }),
    }
}
