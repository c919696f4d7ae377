//! Constructor id derivation for definitions written without `#id`.

/// Derives the constructor id TL assigns to `definition`.
///
/// The id is the CRC-32 of the normalised definition text: any explicit
/// `#id` is dropped, `flags.N?true` parameters are removed, `<`/`>` become a
/// single space, braces are removed and `bytes` is spelled `string`. The
/// `= Type` part is kept.
///
/// ```
/// use tlwire_parser::derive_id;
/// assert_eq!(derive_id("boolFalse = Bool"), 0xbc799737);
/// ```
pub fn derive_id(definition: &str) -> u32 {
    let definition = definition.trim().trim_end_matches(';');
    let mut normalised = String::with_capacity(definition.len());

    for (i, token) in definition.split_whitespace().enumerate() {
        let token = if i == 0 {
            token.split_once('#').map_or(token, |(name, _)| name)
        } else {
            token
        };
        if is_true_flag(token) {
            continue;
        }
        if !normalised.is_empty() {
            normalised.push(' ');
        }
        normalised.push_str(token);
    }

    let normalised = normalised
        .replace(":bytes", ":string")
        .replace("?bytes", "?string")
        .replace('<', " ")
        .replace(['>', '{', '}'], "");

    crc32(normalised.as_bytes())
}

/// `name:flags.N?true`: presence-only parameters do not take part in the id.
fn is_true_flag(token: &str) -> bool {
    token
        .split_once(':')
        .and_then(|(_, ty)| ty.split_once('?'))
        .is_some_and(|(flag, ty)| ty == "true" && flag.contains('.'))
}

/// CRC-32 (ISO 3309, reflected, polynomial `0xEDB88320`).
fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_constructors() {
        assert_eq!(derive_id("boolFalse = Bool"), 0xbc799737);
        assert_eq!(derive_id("boolTrue = Bool;"), 0x997275b5);
    }

    #[test]
    fn explicit_id_is_ignored() {
        assert_eq!(derive_id("boolFalse#deadbeef = Bool"), 0xbc799737);
    }

    #[test]
    fn vector_arguments_are_flattened() {
        assert_eq!(
            derive_id("messages.stickers hash:long stickers:Vector<Document> = messages.Stickers"),
            0x30a6ec7e
        );
    }

    #[test]
    fn true_flags_are_dropped() {
        let def = "messages.transcribedAudio flags:# pending:flags.0?true transcription_id:long \
                   text:string trial_remains_num:flags.1?int trial_remains_until_date:flags.1?int \
                   = messages.TranscribedAudio";
        assert_eq!(derive_id(def), 0xcfb9d957);
    }
}
