//! Hex input handling.

use std::io::Read;

use anyhow::{Context, Result};

/// Reads hex text from `source`, or from stdin when `source` is `-`.
pub fn read(source: &str) -> Result<Vec<u8>> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        parse(&text)
    } else {
        parse(source)
    }
}

/// Decodes hex text. Whitespace, `:` separators and a leading `0x` are
/// ignored.
pub fn parse(text: &str) -> Result<Vec<u8>> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&digits).with_context(|| format!("invalid hex input ({} digits)", digits.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_spaced() {
        assert_eq!(parse("a810e435").unwrap(), [0xa8, 0x10, 0xe4, 0x35]);
        assert_eq!(parse(" a8 10\ne4:35 \n").unwrap(), [0xa8, 0x10, 0xe4, 0x35]);
        assert_eq!(parse("0xB5757299").unwrap(), [0xb5, 0x75, 0x72, 0x99]);
    }

    #[test]
    fn empty_is_empty() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("abc").is_err());
        assert!(parse("zz").is_err());
    }
}
