#![cfg(feature = "functions")]

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use tlwire::{BuildError, Call, Decoder, Error, Object, Serializable, Value};

fn input_invoice() -> Object {
    Object::builder("inputInvoiceSlug").set("slug", "abc").build().unwrap()
}

#[test]
fn call_without_params_is_its_signature() {
    let call = Call::builder("payments.getSavedInfo").build().unwrap();
    assert_eq!(call.to_bytes(), 0x227d824bu32.to_le_bytes());
}

#[test]
fn call_with_flags() {
    let call = Call::builder("payments.clearSavedInfo").set("credentials", true).build().unwrap();
    let mut expected = 0xd83d70c1u32.to_le_bytes().to_vec();
    expected.extend(1u32.to_le_bytes());
    assert_eq!(call.to_bytes(), expected);
}

#[test]
fn bool_response() {
    let call = Call::builder("payments.clearSavedInfo").build().unwrap();
    assert_eq!(call.read_response(&true.to_bytes()), Ok(Value::Bool(true)));
    assert_eq!(call.read_response(&false.to_bytes()), Ok(Value::Bool(false)));
    assert_matches!(
        call.read_response(&[1, 2, 3, 4]),
        Err(Error::UnexpectedConstructor { expected: Some(ty), .. }) if ty == "Bool"
    );
}

#[test]
fn object_response() {
    let call = Call::builder("payments.getPaymentForm")
        .set("invoice", input_invoice())
        .build()
        .unwrap();

    let form = Object::builder("payments.paymentFormStars")
        .set("form_id", 1i64)
        .set("bot_id", 2i64)
        .set("title", "Stars")
        .set("description", "")
        .set(
            "invoice",
            Object::builder("invoice")
                .set("currency", "XTR")
                .set("prices", Value::Vector(vec![]))
                .build()
                .unwrap(),
        )
        .set("users", Value::Vector(vec![]))
        .build()
        .unwrap();

    let response = call.read_response(&form.to_bytes()).unwrap();
    assert_eq!(response, Value::Object(form));
}

#[test]
fn response_of_wrong_type() {
    let call = Call::builder("payments.getBankCardData").set("number", "4242").build().unwrap();
    let other = Object::builder("payments.exportedInvoice").set("url", "u").build().unwrap();
    assert_matches!(
        call.read_response(&other.to_bytes()),
        Err(Error::UnexpectedConstructor { id: 0xaed0cbd9, .. })
    );
}

#[test]
fn response_with_trailing_bytes() {
    let call = Call::builder("payments.clearSavedInfo").build().unwrap();
    let mut bytes = true.to_bytes();
    bytes.push(0);
    assert_eq!(call.read_response(&bytes), Err(Error::TrailingBytes { count: 1 }));
}

#[test]
fn request_round_trip() {
    let peer = Object::builder("inputPeerUser")
        .set("user_id", 10i64)
        .set("access_hash", -10i64)
        .build()
        .unwrap();
    let call = Call::builder("phone.getGroupParticipants")
        .set(
            "call",
            Object::builder("inputGroupCall").set("id", 1i64).set("access_hash", 2i64).build().unwrap(),
        )
        .set("ids", Value::vector([peer]))
        .set("sources", Value::vector([1i32, 2, 3]))
        .set("offset", "")
        .set("limit", 100)
        .build()
        .unwrap();

    let bytes = call.to_bytes();
    let mut decoder = Decoder::new(&bytes);
    assert_eq!(decoder.read_call().unwrap(), call);
    assert!(decoder.finish().is_ok());
}

#[test]
fn send_payment_form_optional_params() {
    let credentials = Object::builder("inputPaymentCredentialsSaved")
        .set("id", "c1")
        .set("tmp_password", Value::bytes(*b"secret"))
        .build()
        .unwrap();
    let base = || {
        Call::builder("payments.sendPaymentForm")
            .set("form_id", 7i64)
            .set("invoice", input_invoice())
            .set("credentials", credentials.clone())
    };

    let plain = base().build().unwrap().to_bytes();
    let tipped = base().set("tip_amount", 500i64).build().unwrap().to_bytes();
    assert_eq!(tipped.len() - plain.len(), 8);
    assert_eq!(&tipped[4..8], &0b100u32.to_le_bytes());
}

#[test]
fn unknown_function() {
    assert_eq!(
        Call::builder("payments.fly").build(),
        Err(BuildError::UnknownConstructor { name: "payments.fly".into() })
    );
}

#[test]
fn call_param_access() {
    let call = Call::builder("payments.checkGiftCode").set("slug", "GIFT").build().unwrap();
    assert_eq!(call.name(), "payments.checkGiftCode");
    assert_eq!(call.get("slug").and_then(Value::as_str), Some("GIFT"));
    assert_eq!(call.function().returns.to_string(), "payments.CheckedGiftCode");
}
