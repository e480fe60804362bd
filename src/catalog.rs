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

use std::collections::BTreeMap;

/// Compiled messages, mapping each `msgid` to its `msgstr`.
///
/// Keys and values are raw bytes. Plural forms are stored NUL-joined,
/// e.g. `b"cat\0cats"` mapping to `b"mushuk\0mushuklar"`. The entry
/// with the empty key is the catalog header.
///
/// Iteration is in ascending byte order of the keys, which is the
/// order used in MO files.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Catalog {
    messages: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message, replacing any previous message with the same
    /// key.
    pub fn insert(&mut self, msgid: Vec<u8>, msgstr: Vec<u8>) {
        if let Some(previous) = self.messages.insert(msgid, msgstr) {
            tracing::debug!(
                "Replaced earlier translation {:?}",
                String::from_utf8_lossy(&previous)
            );
        }
    }

    pub fn get(&self, msgid: &[u8]) -> Option<&[u8]> {
        self.messages.get(msgid).map(Vec::as_slice)
    }

    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over `(msgid, msgstr)` pairs sorted by `msgid`.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.messages
            .iter()
            .map(|(msgid, msgstr)| (msgid.as_slice(), msgstr.as_slice()))
    }

    /// Returns the value of `field` in the header entry, if any.
    ///
    /// The header is the translation of the empty `msgid`, made of
    /// `Name: value` lines such as `Language: uz`.
    pub fn header_field(&self, field: &str) -> Option<String> {
        let header = String::from_utf8_lossy(self.get(b"")?);
        header.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            (name.trim() == field).then(|| value.trim().to_string())
        })
    }
}

impl<K: Into<Vec<u8>>, V: Into<Vec<u8>>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (msgid, msgstr) in iter {
            catalog.insert(msgid.into(), msgstr.into());
        }
        catalog
    }
}
