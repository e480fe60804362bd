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

//! Parsing PO files into a [`Catalog`].
//!
//! The parser is lenient: lines it does not understand are skipped
//! and counted in [`ParseStats::skipped_lines`]. Only entries which
//! are translated and not marked fuzzy end up in the catalog.

use crate::catalog::Catalog;
use crate::escape::decode;
use crate::line::{classify, Line};
use crate::stats::ParseStats;
use std::mem;

/// Which part of an entry the parser is reading.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum State {
    /// Between entries.
    #[default]
    None,
    /// Reading `msgid` and `msgid_plural` lines.
    InId,
    /// Reading `msgstr` or `msgstr[N]` lines.
    InStr,
}

/// A line-by-line PO parser.
///
/// Feed it lines with [`Parser::feed_line`] and call
/// [`Parser::finish`] to get the catalog.
///
/// ```
/// use po_compiler::po::Parser;
///
/// let mut parser = Parser::new();
/// parser.feed_line(r#"msgid "Hello""#);
/// parser.feed_line(r#"msgstr "Salom""#);
/// let (catalog, stats) = parser.finish();
/// assert_eq!(catalog.get(b"Hello"), Some(&b"Salom"[..]));
/// assert_eq!(stats.translated, 1);
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    state: State,
    /// The last `msgid` read, with any `msgid_plural` appended.
    ///
    /// It is kept after a flush: a later `msgid_plural`, `msgstr` or
    /// `msgstr[N]` line reopens an entry for it.
    msgid: Option<Vec<u8>>,
    msgstr: Vec<u8>,
    /// Whether the open entry is fuzzy.
    fuzzy: bool,
    /// Number of `msgstr[N]` lines seen in the open entry.
    plural_forms: u32,
    /// An entry was started and not flushed yet.
    open: bool,
    /// Set by a `#, fuzzy` comment, consumed by the next `msgid`.
    next_is_fuzzy: bool,
    lineno: usize,
    catalog: Catalog,
    stats: ParseStats,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process the next physical line of the file.
    pub fn feed_line(&mut self, line: &str) {
        self.lineno += 1;
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let Some(line) = classify(line) else {
            self.skip(line);
            return;
        };

        match line {
            Line::Comment | Line::FuzzyComment => {
                if self.state == State::InStr {
                    self.flush();
                }
                if line == Line::FuzzyComment {
                    self.next_is_fuzzy = true;
                }
            }
            Line::Msgid(literal) => {
                // Outside of `InStr` this only discards an entry which
                // has no translation yet.
                self.flush();
                self.msgid = Some(decode(literal.as_bytes()));
                self.msgstr.clear();
                self.fuzzy = mem::take(&mut self.next_is_fuzzy);
                self.open = true;
                self.state = State::InId;
            }
            Line::MsgidPlural(literal) => {
                if self.state == State::InStr {
                    self.flush();
                }
                match &mut self.msgid {
                    Some(msgid) => {
                        msgid.push(b'\0');
                        msgid.extend(decode(literal.as_bytes()));
                        self.open = true;
                        self.state = State::InId;
                    }
                    None => self.skip(literal),
                }
            }
            Line::MsgstrPlural(index, literal) => {
                if self.msgid.is_none() {
                    self.skip(literal);
                    return;
                }
                // Coming from `msgid_plural`, or reopening the last
                // msgid after a flush.
                if self.state != State::InStr {
                    self.msgstr.clear();
                    self.plural_forms = 0;
                    self.open = true;
                    self.state = State::InStr;
                }
                if index != self.plural_forms {
                    tracing::debug!(
                        lineno = self.lineno,
                        "Expected msgstr[{}], found msgstr[{index}]",
                        self.plural_forms
                    );
                }
                self.plural_forms += 1;
                if !self.msgstr.is_empty() {
                    self.msgstr.push(b'\0');
                }
                self.msgstr.extend(decode(literal.as_bytes()));
            }
            Line::Msgstr(literal) => {
                if self.msgid.is_none() {
                    self.skip(literal);
                    return;
                }
                self.msgstr = decode(literal.as_bytes());
                self.open = true;
                self.state = State::InStr;
            }
            Line::Continuation(literal) => match self.state {
                State::InId => {
                    if let Some(msgid) = &mut self.msgid {
                        msgid.extend(decode(literal.as_bytes()));
                    }
                }
                State::InStr => self.msgstr.extend(decode(literal.as_bytes())),
                State::None => self.skip(literal),
            },
        }
    }

    /// Close the last entry and return the catalog.
    pub fn finish(mut self) -> (Catalog, ParseStats) {
        self.flush();
        self.stats.language = self.catalog.header_field("Language").unwrap_or_default();
        tracing::info!(
            "Parsed {} messages from {} lines ({})",
            self.catalog.len(),
            self.lineno,
            self.stats
        );
        (self.catalog, self.stats)
    }

    /// Commit the open entry if it is translated and not fuzzy.
    ///
    /// The msgid stays around for lines which extend or reuse it.
    fn flush(&mut self) {
        if !mem::take(&mut self.open) {
            return;
        }
        let Some(msgid) = &self.msgid else {
            return;
        };
        let msgstr = mem::take(&mut self.msgstr);
        self.plural_forms = 0;
        self.state = State::None;
        if mem::take(&mut self.fuzzy) {
            tracing::debug!(
                lineno = self.lineno,
                "Dropping fuzzy message {:?}",
                String::from_utf8_lossy(msgid)
            );
            self.stats.fuzzy += 1;
        } else if msgstr.is_empty() {
            tracing::debug!(
                lineno = self.lineno,
                "Dropping untranslated message {:?}",
                String::from_utf8_lossy(msgid)
            );
            self.stats.untranslated += 1;
        } else {
            self.stats.translated += 1;
            self.catalog.insert(msgid.clone(), msgstr);
        }
    }

    fn skip(&mut self, line: &str) {
        tracing::debug!(lineno = self.lineno, "Skipping unexpected line {line:?}");
        self.stats.skipped_lines += 1;
    }
}

/// Parse the content of a PO file.
pub fn parse(source: &str) -> (Catalog, ParseStats) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut parser = Parser::new();
    for line in source.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn messages(source: &str) -> Vec<(String, String)> {
        let (catalog, _) = parse(source);
        catalog
            .iter()
            .map(|(msgid, msgstr)| {
                (
                    String::from_utf8_lossy(msgid).into_owned(),
                    String::from_utf8_lossy(msgstr).into_owned(),
                )
            })
            .collect()
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(msgid, msgstr)| (msgid.to_string(), msgstr.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_single_message() {
        assert_eq!(
            messages(
                "msgid \"Hello\"\n\
                 msgstr \"Salom\"\n"
            ),
            pairs(&[("Hello", "Salom")])
        );
    }

    #[test]
    fn test_parse_empty_source() {
        let (catalog, stats) = parse("");
        assert!(catalog.is_empty());
        assert_eq!(stats, ParseStats::default());
    }

    #[test]
    fn test_parse_fuzzy_is_excluded() {
        let (catalog, stats) = parse(
            "#, fuzzy\n\
             msgid \"Bye\"\n\
             msgstr \"Xayr\"\n",
        );
        assert!(catalog.is_empty());
        assert_eq!(stats.fuzzy, 1);
    }

    #[test]
    fn test_parse_fuzzy_survives_other_comments() {
        assert_eq!(
            messages(
                "#, fuzzy\n\
                 #: src/views.py:12\n\
                 # Translator note\n\
                 msgid \"Bye\"\n\
                 msgstr \"Xayr\"\n"
            ),
            pairs(&[])
        );
    }

    #[test]
    fn test_parse_fuzzy_flag_applies_to_next_entry_only() {
        assert_eq!(
            messages(
                "msgid \"One\"\n\
                 msgstr \"Bir\"\n\
                 \n\
                 #, fuzzy\n\
                 msgid \"Two\"\n\
                 msgstr \"Ikki\"\n\
                 \n\
                 msgid \"Three\"\n\
                 msgstr \"Uch\"\n"
            ),
            pairs(&[("One", "Bir"), ("Three", "Uch")])
        );
    }

    #[test]
    fn test_parse_fuzzy_comment_without_blank_line() {
        // The fuzzy comment closes the previous entry, which is kept.
        assert_eq!(
            messages(
                "msgid \"One\"\n\
                 msgstr \"Bir\"\n\
                 #, fuzzy\n\
                 msgid \"Two\"\n\
                 msgstr \"Ikki\"\n"
            ),
            pairs(&[("One", "Bir")])
        );
    }

    #[test]
    fn test_parse_other_flags_are_not_fuzzy() {
        assert_eq!(
            messages(
                "#, python-format\n\
                 msgid \"%(count)s reviews\"\n\
                 msgstr \"%(count)s sharh\"\n"
            ),
            pairs(&[("%(count)s reviews", "%(count)s sharh")])
        );
    }

    #[test]
    fn test_parse_empty_msgstr_is_excluded() {
        let (catalog, stats) = parse(
            "msgid \"Untranslated\"\n\
             msgstr \"\"\n\
             \n\
             msgid \"Translated\"\n\
             msgstr \"Tarjima\"\n",
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(b"Untranslated"), None);
        assert_eq!(stats.untranslated, 1);
        assert_eq!(stats.translated, 1);
    }

    #[test]
    fn test_parse_msgid_without_msgstr_is_dropped() {
        let (catalog, stats) = parse(
            "msgid \"Lonely\"\n\
             msgid \"Hello\"\n\
             msgstr \"Salom\"\n\
             msgid \"Trailing\"\n",
        );
        assert_eq!(catalog, Catalog::from_iter([("Hello", "Salom")]));
        assert_eq!(stats.untranslated, 2);
    }

    #[test]
    fn test_parse_sorted_not_file_order() {
        assert_eq!(
            messages(
                "msgid \"B\"\n\
                 msgstr \"b\"\n\
                 \n\
                 msgid \"A\"\n\
                 msgstr \"a\"\n"
            ),
            pairs(&[("A", "a"), ("B", "b")])
        );
    }

    #[test]
    fn test_parse_continuation_lines() {
        assert_eq!(
            messages(
                "msgid \"\"\n\
                 \"Hello \"\n\
                 \"World\"\n\
                 msgstr \"\"\n\
                 \"Salom \"\n\
                 \"Dunyo\"\n"
            ),
            pairs(&[("Hello World", "Salom Dunyo")])
        );
    }

    #[test]
    fn test_parse_escapes() {
        assert_eq!(
            messages(
                r#"msgid "Line 1\nLine 2 \"quoted\""
msgstr "Qator 1\nQator 2 \"iqtibos\"""#
            ),
            pairs(&[("Line 1\nLine 2 \"quoted\"", "Qator 1\nQator 2 \"iqtibos\"")])
        );
    }

    #[test]
    fn test_parse_plural_forms() {
        let (catalog, _) = parse(
            "msgid \"cat\"\n\
             msgid_plural \"cats\"\n\
             msgstr[0] \"mushuk\"\n\
             msgstr[1] \"mushuklar\"\n",
        );
        assert_eq!(
            catalog.iter().collect::<Vec<_>>(),
            vec![(&b"cat\0cats"[..], &b"mushuk\0mushuklar"[..])]
        );
    }

    #[test]
    fn test_parse_plural_forms_with_continuations() {
        let (catalog, _) = parse(
            "msgid \"one \"\n\
             \"review\"\n\
             msgid_plural \"many \"\n\
             \"reviews\"\n\
             msgstr[0] \"bitta \"\n\
             \"sharh\"\n\
             msgstr[1] \"ko'p sharh\"\n",
        );
        assert_eq!(
            catalog.get(b"one review\0many reviews"),
            Some(&b"bitta sharh\0ko'p sharh"[..])
        );
    }

    #[test]
    fn test_parse_plural_forms_all_empty_are_excluded() {
        let (catalog, stats) = parse(
            "msgid \"cat\"\n\
             msgid_plural \"cats\"\n\
             msgstr[0] \"\"\n\
             msgstr[1] \"\"\n",
        );
        assert!(catalog.is_empty());
        assert_eq!(stats.untranslated, 1);
    }

    #[test]
    fn test_parse_plural_separator_follows_accumulated_value() {
        // No separator is added while the accumulated value is empty.
        let (catalog, _) = parse(
            "msgid \"cat\"\n\
             msgid_plural \"cats\"\n\
             msgstr[0] \"\"\n\
             msgstr[1] \"mushuklar\"\n",
        );
        assert_eq!(catalog.get(b"cat\0cats"), Some(&b"mushuklar"[..]));
    }

    #[test]
    fn test_parse_header_entry() {
        let (catalog, stats) = parse(
            "# Uzbek translation.\n\
             msgid \"\"\n\
             msgstr \"\"\n\
             \"Content-Type: text/plain; charset=UTF-8\\n\"\n\
             \"Language: uz\\n\"\n\
             \n\
             msgid \"Hello\"\n\
             msgstr \"Salom\"\n",
        );
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(b""),
            Some(&b"Content-Type: text/plain; charset=UTF-8\nLanguage: uz\n"[..])
        );
        assert_eq!(stats.language, "uz");
    }

    #[test]
    fn test_parse_duplicate_last_write_wins() {
        assert_eq!(
            messages(
                "msgid \"Hello\"\n\
                 msgstr \"Salom\"\n\
                 \n\
                 msgid \"Hello\"\n\
                 msgstr \"Assalomu alaykum\"\n"
            ),
            pairs(&[("Hello", "Assalomu alaykum")])
        );
    }

    #[test]
    fn test_parse_comment_between_msgid_and_msgstr() {
        assert_eq!(
            messages(
                "msgid \"Hello\"\n\
                 # stray comment\n\
                 msgstr \"Salom\"\n"
            ),
            pairs(&[("Hello", "Salom")])
        );
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let (catalog, stats) = parse(
            "msgctxt \"menu\"\n\
             msgid \"File\"\n\
             garbage here\n\
             msgstr \"Fayl\"\n\
             \"continued\"\n",
        );
        assert_eq!(catalog, Catalog::from_iter([("File", "Faylcontinued")]));
        assert_eq!(stats.skipped_lines, 2);
    }

    #[test]
    fn test_parse_skips_lines_before_first_msgid() {
        let (catalog, stats) = parse(
            "\"orphan continuation\"\n\
             msgstr \"orphan\"\n\
             msgstr[0] \"orphan\"\n\
             msgid_plural \"orphan\"\n\
             msgid \"Hello\"\n\
             msgstr \"Salom\"\n\
             # closes the entry\n\
             \"after comment\"\n",
        );
        assert_eq!(catalog, Catalog::from_iter([("Hello", "Salom")]));
        assert_eq!(stats.skipped_lines, 5);
    }

    #[test]
    fn test_parse_msgid_plural_after_msgstr_extends_last_msgid() {
        let (catalog, stats) = parse(
            "msgid \"a\"\n\
             msgstr \"A\"\n\
             msgid_plural \"as\"\n\
             msgstr[0] \"x\"\n",
        );
        assert_eq!(catalog, Catalog::from_iter([("a", "A"), ("a\0as", "x")]));
        assert_eq!(stats.skipped_lines, 0);
    }

    #[test]
    fn test_parse_msgstr_after_comment_reuses_last_msgid() {
        let (catalog, stats) = parse(
            "msgid \"a\"\n\
             msgstr \"A\"\n\
             # c\n\
             msgstr \"B\"\n",
        );
        assert_eq!(catalog, Catalog::from_iter([("a", "B")]));
        assert_eq!(stats.skipped_lines, 0);
    }

    #[test]
    fn test_parse_plural_msgstr_after_comment_reuses_last_msgid() {
        let (catalog, _) = parse(
            "msgid \"cat\"\n\
             msgid_plural \"cats\"\n\
             msgstr[0] \"mushuk\"\n\
             # c\n\
             msgstr[0] \"pishak\"\n\
             msgstr[1] \"pishaklar\"\n",
        );
        assert_eq!(catalog.get(b"cat\0cats"), Some(&b"pishak\0pishaklar"[..]));
    }

    #[test]
    fn test_parse_trims_whitespace_and_crlf() {
        assert_eq!(
            messages("  msgid \"Hello\"  \r\n\tmsgstr \"Salom\"\t\r\n"),
            pairs(&[("Hello", "Salom")])
        );
    }

    #[test]
    fn test_parse_byte_order_mark() {
        assert_eq!(
            messages("\u{feff}msgid \"Hello\"\nmsgstr \"Salom\"\n"),
            pairs(&[("Hello", "Salom")])
        );
    }

    #[test]
    fn test_parse_malformed_literal_keeps_raw_bytes() {
        assert_eq!(
            messages("msgid \"Hello\"\nmsgstr \"Sa\"lom\"\n"),
            pairs(&[("Hello", "\"Sa\"lom\"")])
        );
    }

    #[test]
    fn test_feed_line_counts_lines() {
        let mut parser = Parser::new();
        for line in ["", "msgid \"a\"", "???", "msgstr \"b\""] {
            parser.feed_line(line);
        }
        let (catalog, stats) = parser.finish();
        assert_eq!(catalog.get(b"a"), Some(&b"b"[..]));
        assert_eq!(
            stats,
            ParseStats {
                translated: 1,
                skipped_lines: 1,
                ..ParseStats::default()
            }
        );
    }
}
