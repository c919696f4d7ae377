//! Wire-format tests against the shipped schema.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use tlwire::consts::VECTOR_ID;
use tlwire::schema::{FieldKind, FieldType, VariantDescriptor};
use tlwire::{Decoder, Error, Object, ObjectBuilder, Registry, Serializable, Value, decode_any, decode_boxed};

// ─── Sample values ───────────────────────────────────────────────────────────

/// A value of `ty` with boundary content. Optional fields are filled when
/// `all` is set.
fn sample(ty: &FieldType, all: bool, depth: usize) -> Value {
    match ty {
        FieldType::Int => Value::Int(i32::MIN),
        FieldType::Long => Value::Long(i64::MAX),
        FieldType::Double => Value::Double(-0.5),
        FieldType::Bool | FieldType::True => Value::Bool(true),
        FieldType::String => Value::from("héllo wörld"),
        FieldType::Bytes => Value::bytes(vec![0u8, 1, 2, 254, 255]),
        FieldType::Int128 => Value::Int128([7; 16]),
        FieldType::Int256 => Value::Int256([9; 32]),
        FieldType::Vector(inner) | FieldType::BareVector(inner) => {
            Value::Vector(vec![sample(inner, all, depth + 1); 2])
        }
        FieldType::Boxed(name) => {
            let variants = Registry::global().variants_of(name);
            // Prefer the richest variant near the top, the simplest deeper down.
            let pick = if depth < 3 {
                variants.iter().max_by_key(|v| v.fields.len())
            } else {
                variants.iter().min_by_key(|v| v.fields.len())
            };
            Value::Object(sample_object(pick.expect("type has variants"), all, depth + 1))
        }
        FieldType::Bare(name) => {
            let variant = Registry::global().bare_variant(name).expect("bare variant");
            Value::Object(sample_object(variant, all, depth + 1))
        }
    }
}

fn sample_object(variant: &'static VariantDescriptor, all: bool, depth: usize) -> Object {
    let mut b = ObjectBuilder::new(variant);
    for field in variant.fields {
        match field.kind {
            FieldKind::Value { ty, flag: None } => b = b.set(field.name, sample(&ty, all, depth)),
            FieldKind::Value { ty, flag: Some(_) } if all => {
                b = b.set(field.name, sample(&ty, all, depth))
            }
            _ => {}
        }
    }
    b.build().unwrap_or_else(|e| panic!("{}: {e}", variant.name))
}

// ─── Round trips ─────────────────────────────────────────────────────────────

#[test]
fn every_variant_round_trips() {
    for variant in Registry::global().constructors() {
        for all in [false, true] {
            let obj = sample_object(variant, all, 0);
            let bytes = obj.to_bytes();
            let back = decode_boxed(variant.type_name, &bytes)
                .unwrap_or_else(|e| panic!("{} (all={all}): {e}", variant.name));
            assert_eq!(back, obj, "{}", variant.name);
            assert_eq!(back.to_bytes(), bytes);
        }
    }
}

#[test]
fn bare_encoding_omits_signature() {
    let obj = Object::builder("labeledPrice")
        .set("label", "Total")
        .set("amount", 4200i64)
        .build()
        .unwrap();
    let boxed = obj.to_bytes();
    let bare = obj.to_bytes_bare();
    assert_eq!(&boxed[..4], &0xcb296bf8u32.to_le_bytes());
    assert_eq!(&boxed[4..], &bare[..]);
}

#[test]
fn boundary_values() {
    let cases = [(String::new(), i64::MIN), ("x".repeat(253), 0), ("y".repeat(254), i64::MAX)];
    for (label, amount) in cases {
        let obj = Object::builder("labeledPrice")
            .set("label", label)
            .set("amount", amount)
            .build()
            .unwrap();
        let bytes = obj.to_bytes();
        assert_eq!(bytes.len() % 4, 0);
        assert_eq!(decode_boxed("LabeledPrice", &bytes).unwrap(), obj);
    }
}

#[test]
fn long_bytes_round_trip() {
    let obj = Object::builder("inputPaymentCredentialsSaved")
        .set("id", "card")
        .set("tmp_password", Value::bytes(vec![0x5au8; 70_000]))
        .build()
        .unwrap();
    let back = decode_boxed("InputPaymentCredentials", &obj.to_bytes()).unwrap();
    assert_eq!(back.get("tmp_password").and_then(Value::as_bytes).map(<[u8]>::len), Some(70_000));
}

// ─── Exact bytes ─────────────────────────────────────────────────────────────

#[test]
fn sticker_set_install_result_archive() {
    let expected: [u8; 12] = [0xa8, 0x10, 0xe4, 0x35, 0x15, 0xc4, 0xb5, 0x1c, 0x00, 0x00, 0x00, 0x00];

    let obj = Object::builder("messages.stickerSetInstallResultArchive")
        .set("sets", Value::Vector(vec![]))
        .build()
        .unwrap();
    assert_eq!(obj.id(), 904138920);
    assert_eq!(obj.to_bytes(), expected);

    let back = decode_boxed("messages.StickerSetInstallResult", &expected).unwrap();
    assert_eq!(back.name(), "messages.stickerSetInstallResultArchive");
    assert_eq!(back.get("sets"), Some(&Value::Vector(vec![])));
}

#[test]
fn flags_word_is_derived() {
    let obj = Object::builder("messages.transcribedAudio")
        .set("pending", true)
        .set("transcription_id", 1i64)
        .set("text", "hi")
        .build()
        .unwrap();
    assert_eq!(
        obj.to_bytes(),
        [
            0x57, 0xd9, 0xb9, 0xcf, // signature
            0x01, 0x00, 0x00, 0x00, // flags: pending
            0x01, 0, 0, 0, 0, 0, 0, 0, // transcription_id
            0x02, b'h', b'i', 0x00, // text
        ]
    );
}

// ─── Flags ───────────────────────────────────────────────────────────────────

#[test]
fn absent_optional_writes_nothing() {
    let info = Object::builder("paymentRequestedInfo")
        .set("name", "Ann")
        .set("email", "ann@example.com")
        .build()
        .unwrap();

    let without = Object::builder("payments.savedInfo").build().unwrap();
    let with = Object::builder("payments.savedInfo")
        .set("saved_info", info.clone())
        .build()
        .unwrap();

    let (a, b) = (without.to_bytes(), with.to_bytes());
    assert_eq!(b.len() - a.len(), info.to_bytes().len());
    assert_eq!(without.flags(0), 0);
    assert_eq!(with.flags(0), 0b1);
}

#[test]
fn true_flag_changes_only_the_flags_word() {
    let off = Object::builder("payments.savedInfo").build().unwrap();
    let on = Object::builder("payments.savedInfo")
        .set("has_saved_credentials", true)
        .build()
        .unwrap();

    let (a, b) = (off.to_bytes(), on.to_bytes());
    assert_eq!(a.len(), b.len());
    assert_eq!(&b[4..8], &0b10u32.to_le_bytes());
    assert_eq!(decode_boxed("payments.SavedInfo", &b).unwrap().get("has_saved_credentials"), Some(&Value::Bool(true)));
    assert_eq!(decode_boxed("payments.SavedInfo", &a).unwrap().get("has_saved_credentials"), Some(&Value::Bool(false)));
}

#[test]
fn shared_bit_reads_both_fields() {
    let obj = Object::builder("messages.transcribedAudio")
        .set("transcription_id", 9i64)
        .set("text", "")
        .set("trial_remains_num", 3)
        .set("trial_remains_until_date", 1_700_000_000)
        .build()
        .unwrap();
    let bytes = obj.to_bytes();
    assert_eq!(&bytes[4..8], &0b10u32.to_le_bytes());
    assert_eq!(decode_boxed("messages.TranscribedAudio", &bytes).unwrap(), obj);
}

#[test]
fn unknown_flag_bits_survive_a_round_trip() {
    // Bit 2 gates nothing in payments.savedInfo.
    let bytes: [u8; 8] = [0x3c, 0xe4, 0x8f, 0xfb, 0x06, 0x00, 0x00, 0x00];
    let decoded = decode_boxed("payments.SavedInfo", &bytes).unwrap();
    assert_eq!(decoded.get("has_saved_credentials"), Some(&Value::Bool(true)));
    assert_eq!(decoded.get("flags"), None);
    assert_eq!(decoded.flags(0), 0b110);
    assert_eq!(decoded.to_bytes(), bytes);

    let built = Object::builder("payments.savedInfo")
        .set("has_saved_credentials", true)
        .build()
        .unwrap();
    assert_eq!(built.flags(0), 0b10);
    assert_ne!(decoded, built);
}

#[test]
fn unknown_high_bit_next_to_values() {
    let bytes: [u8; 20] = [
        0x57, 0xd9, 0xb9, 0xcf, // signature
        0x01, 0x00, 0x00, 0x80, // flags: pending, bit 31
        0x01, 0, 0, 0, 0, 0, 0, 0, // transcription_id
        0x02, b'h', b'i', 0x00, // text
    ];
    let decoded = decode_boxed("messages.TranscribedAudio", &bytes).unwrap();
    assert_eq!(decoded.flags(0), 0x8000_0001);
    assert_eq!(decoded.get("text").and_then(Value::as_str), Some("hi"));
    assert_eq!(decoded.to_bytes(), bytes);
}

#[test]
fn modelled_bits_equal_built_object() {
    let built = Object::builder("payments.savedInfo")
        .set("has_saved_credentials", true)
        .build()
        .unwrap();
    let decoded = decode_boxed("payments.SavedInfo", &built.to_bytes()).unwrap();
    assert_eq!(decoded, built);
}

#[test]
fn nan_doubles_compare_by_bits() {
    let bits = 0x7ff8_0000_dead_beef_u64;
    let bytes = bits.to_le_bytes();
    let value = Decoder::new(&bytes).read_value(&FieldType::Double).unwrap();
    assert_eq!(value, Value::Double(f64::from_bits(bits)));
    assert_ne!(Value::Double(0.0), Value::Double(-0.0));
    assert_eq!(value.as_f64().map(f64::to_bits), Some(bits));
}

// ─── Vectors ─────────────────────────────────────────────────────────────────

fn stickers(count: usize) -> Object {
    let doc = Object::builder("documentEmpty").set("id", 5i64).build().unwrap();
    Object::builder("messages.stickers")
        .set("hash", -1i64)
        .set("stickers", Value::Vector(vec![doc.into(); count]))
        .build()
        .unwrap()
}

#[test]
fn vector_framing() {
    for count in [0usize, 1000] {
        let obj = stickers(count);
        let bytes = obj.to_bytes();
        assert_eq!(bytes.len(), 20 + count * 12);
        assert_eq!(&bytes[12..16], &VECTOR_ID.to_le_bytes());
        assert_eq!(&bytes[16..20], &(count as i32).to_le_bytes());

        let back = decode_boxed("messages.Stickers", &bytes).unwrap();
        assert_eq!(back.get("stickers").and_then(Value::as_vector).map(<[Value]>::len), Some(count));
        assert_eq!(back, obj);
    }
}

#[test]
fn bad_vector_marker() {
    let mut bytes = stickers(1).to_bytes();
    bytes[12..16].copy_from_slice(&0x11223344u32.to_le_bytes());
    assert_eq!(
        decode_boxed("messages.Stickers", &bytes),
        Err(Error::BadVectorHeader { id: 0x11223344 })
    );
}

#[test]
fn negative_count() {
    let mut bytes = stickers(0).to_bytes();
    bytes[16..20].copy_from_slice(&(-1i32).to_le_bytes());
    assert_eq!(decode_boxed("messages.Stickers", &bytes), Err(Error::NegativeLength { len: -1 }));
}

#[test]
fn inflated_count_fails_before_reading() {
    let mut bytes = stickers(2).to_bytes();
    bytes[16..20].copy_from_slice(&500i32.to_le_bytes());
    assert_eq!(decode_boxed("messages.Stickers", &bytes), Err(Error::UnexpectedEof));
}

#[test]
fn bare_vector_has_no_marker() {
    // No shipped definition uses `vector<T>`.
    use tlwire::Decoder;
    static INTS: FieldType = FieldType::BareVector(&FieldType::Int);

    let bytes: [u8; 12] = [2, 0, 0, 0, 7, 0, 0, 0, 8, 0, 0, 0];
    let mut d = Decoder::new(&bytes);
    assert_eq!(d.read_value(&INTS).unwrap(), Value::vector([7i32, 8]));
    assert!(d.finish().is_ok());
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[test]
fn truncation_never_succeeds() {
    for variant in Registry::global().constructors() {
        let bytes = sample_object(variant, true, 0).to_bytes();
        for cut in 0..bytes.len() {
            assert!(
                decode_boxed(variant.type_name, &bytes[..cut]).is_err(),
                "{} decoded from {cut} of {} bytes",
                variant.name,
                bytes.len()
            );
        }
    }
}

#[test]
fn truncation_is_eof() {
    let bytes = stickers(3).to_bytes();
    assert_eq!(decode_boxed("messages.Stickers", &bytes[..bytes.len() - 1]), Err(Error::UnexpectedEof));
}

#[test]
fn unknown_signature() {
    let obj = Object::builder("dataJSON").set("data", "{}").build().unwrap();
    let mut bytes = obj.to_bytes();
    bytes[..4].copy_from_slice(&0xdeadbeefu32.to_le_bytes());

    assert_eq!(
        decode_boxed("DataJSON", &bytes),
        Err(Error::UnexpectedConstructor { id: 0xdeadbeef, expected: Some("DataJSON".into()) })
    );
    assert_eq!(
        decode_any(&bytes),
        Err(Error::UnexpectedConstructor { id: 0xdeadbeef, expected: None })
    );
}

#[test]
fn signature_of_another_type() {
    let bytes = Object::builder("dataJSON").set("data", "{}").build().unwrap().to_bytes();
    assert_matches!(
        decode_boxed("Peer", &bytes),
        Err(Error::UnexpectedConstructor { id: 0x7d748d04, .. })
    );
}

#[test]
fn unknown_type_name() {
    assert_eq!(
        decode_boxed("NoSuchType", &[0; 8]),
        Err(Error::UnknownType { name: "NoSuchType".into() })
    );
}

#[cfg(feature = "functions")]
#[test]
fn nested_bool_must_be_a_bool() {
    let call = tlwire::Call::builder("phone.getGroupCallStreamRtmpUrl")
        .set("peer", Object::builder("inputPeerSelf").build().unwrap())
        .set("revoke", false)
        .build()
        .unwrap();
    let mut bytes = call.to_bytes();
    let n = bytes.len();
    bytes[n - 4..].copy_from_slice(&1u32.to_le_bytes());
    assert_matches!(
        tlwire::Decoder::new(&bytes).read_call(),
        Err(Error::UnexpectedConstructor { id: 1, .. })
    );
}

#[test]
fn invalid_utf8_string() {
    let mut bytes = Object::builder("dataJSON").set("data", "ab").build().unwrap().to_bytes();
    bytes[5] = 0xff;
    assert_eq!(decode_boxed("DataJSON", &bytes), Err(Error::InvalidUtf8));
}

#[test]
fn trailing_bytes() {
    let mut bytes = Object::builder("userEmpty").set("id", 1i64).build().unwrap().to_bytes();
    bytes.extend([0, 0, 0, 0]);
    assert_eq!(decode_boxed("User", &bytes), Err(Error::TrailingBytes { count: 4 }));
}

#[test]
fn decode_any_dispatches_globally() {
    let bytes = Object::builder("peerChannel").set("channel_id", 77i64).build().unwrap().to_bytes();
    let obj = decode_any(&bytes).unwrap();
    assert_eq!(obj.type_name(), "Peer");
    assert_eq!(obj.get("channel_id"), Some(&Value::Long(77)));
}
