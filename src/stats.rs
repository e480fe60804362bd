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

use std::fmt::{self, Display, Formatter};

/// Counts of what happened to the entries of a PO file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseStats {
    /// The `Language` field of the header entry, empty if unknown.
    pub language: String,
    /// Entries written to the catalog.
    pub translated: u32,
    /// Entries dropped because they were marked fuzzy.
    pub fuzzy: u32,
    /// Entries dropped because their `msgstr` was empty.
    pub untranslated: u32,
    pub skipped_lines: u32,
}

impl ParseStats {
    /// Returns the total number of entries seen.
    pub fn total(&self) -> u32 {
        self.translated + self.fuzzy + self.untranslated
    }
}

impl Display for ParseStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if !self.language.is_empty() {
            write!(f, "{}: ", self.language)?;
        }
        write!(
            f,
            "{} of {} messages translated, {} fuzzy, {} untranslated, {} skipped lines",
            self.translated,
            self.total(),
            self.fuzzy,
            self.untranslated,
            self.skipped_lines,
        )
    }
}
