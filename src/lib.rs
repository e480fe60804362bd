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

//! Compile Gettext PO files into binary MO files.
//!
//! A PO file is parsed line by line into a [`Catalog`] which maps
//! each `msgid` to its `msgstr`. Fuzzy and untranslated entries are
//! left out. The catalog is then encoded in the MO format used by
//! `gettext` at runtime.
//!
//! Only UTF-8 PO files are supported. Message contexts (`msgctxt`)
//! and obsolete entries (`#~`) are ignored.
//!
//! # Examples
//!
//! ```
//! use po_compiler::{compile, MoFile};
//!
//! let mo = compile(
//!     "msgid \"Hello\"\n\
//!      msgstr \"Salom\"\n",
//! )
//! .unwrap();
//! let mo = MoFile::parse(&mo).unwrap();
//! assert_eq!(mo.get(b"Hello"), Some(&b"Salom"[..]));
//! ```

pub mod catalog;
pub mod escape;
pub mod line;
pub mod mo;
pub mod po;
pub mod stats;

pub use catalog::Catalog;
pub use mo::{encode, EncodeError, MoError, MoFile};
pub use po::parse;
pub use stats::ParseStats;

/// Compile the content of a PO file into the bytes of an MO file.
pub fn compile(source: &str) -> Result<Vec<u8>, EncodeError> {
    let (catalog, _) = parse(source);
    encode(&catalog)
}
