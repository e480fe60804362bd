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

//! Recognizing the shape of a single PO line.

use regex::Regex;
use std::sync::OnceLock;

/// The shape of one trimmed, non-blank line of a PO file.
///
/// String payloads borrow the quoted literal from the line, quotes
/// included. They still need to go through [`crate::escape::decode`].
#[derive(Debug, PartialEq)]
pub enum Line<'a> {
    /// A `#` comment without a fuzzy flag.
    Comment,
    /// A `#,` flags comment which lists `fuzzy`.
    FuzzyComment,
    Msgid(&'a str),
    MsgidPlural(&'a str),
    Msgstr(&'a str),
    /// A `msgstr[N]` line.
    MsgstrPlural(u32, &'a str),
    /// A bare `"..."` continuation line.
    Continuation(&'a str),
}

/// Classify `line`, returning `None` if it has no known shape.
pub fn classify(line: &str) -> Option<Line<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        let pattern = r#"(?x)
              ^(?<keyword>msgid_plural|msgid|msgstr(?:\[(?<index>[0-9]+)\])?)
              \s*
              (?<literal>".*)$
        "#;
        Regex::new(pattern).expect("well-formed regex")
    });

    let line = line.trim();
    if let Some(flags) = line.strip_prefix("#,") {
        return Some(if flags.split(is_delimiter).any(|f| f == "fuzzy") {
            Line::FuzzyComment
        } else {
            Line::Comment
        });
    }
    if line.starts_with('#') {
        return Some(Line::Comment);
    }
    if line.starts_with('"') {
        return Some(Line::Continuation(line));
    }

    let captures = re.captures(line)?;
    let literal = captures.name("literal")?.as_str();
    match &captures["keyword"] {
        "msgid" => Some(Line::Msgid(literal)),
        "msgid_plural" => Some(Line::MsgidPlural(literal)),
        "msgstr" => Some(Line::Msgstr(literal)),
        _ => {
            let index = captures["index"].parse().ok()?;
            Some(Line::MsgstrPlural(index, literal))
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == ','
}
