//! Line-oriented driver behind [`crate::parse_tl_file`].

use std::str::FromStr;

use crate::ast::{Category, Definition};
use crate::errors::ParseError;

pub(crate) struct TlIterator<'a> {
    lines: std::str::Lines<'a>,
    category: Category,
    /// Text of a definition that has not reached its `;` yet.
    pending: String,
}

impl<'a> TlIterator<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            lines: src.lines(),
            category: Category::Types,
            pending: String::new(),
        }
    }

    fn switch_section(&mut self, line: &str) -> bool {
        match line {
            "---functions---" => self.category = Category::Functions,
            "---types---" => self.category = Category::Types,
            _ => return false,
        }
        true
    }

    fn finish_pending(&mut self) -> Option<Result<Definition, ParseError>> {
        let raw = std::mem::take(&mut self.pending);
        let raw = raw.trim().trim_end_matches(';').trim();
        if raw.is_empty() {
            return None;
        }
        let category = self.category;
        Some(Definition::from_str(raw).map(|mut def| {
            def.category = category;
            def
        }))
    }
}

impl Iterator for TlIterator<'_> {
    type Item = Result<Definition, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(line) = self.lines.next() else {
                // A trailing definition without `;` is still reported.
                return self.finish_pending();
            };
            let line = line.trim();

            if line.is_empty() || line.starts_with("//") || self.switch_section(line) {
                continue;
            }

            // Strip a trailing comment on the same line.
            let line = match line.split_once("//") {
                Some((code, _)) => code.trim_end(),
                None => line,
            };

            self.pending.push(' ');
            self.pending.push_str(line);

            if line.ends_with(';') {
                if let Some(result) = self.finish_pending() {
                    return Some(result);
                }
            }
        }
    }
}
