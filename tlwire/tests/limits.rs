//! Hostile input against a small self-referential schema.

use pretty_assertions::assert_eq;

use tlwire::schema::{FieldDescriptor, FieldKind, FieldType, VariantDescriptor};
use tlwire::{DecodeLimits, Decoder, Error, ObjectBuilder, Registry, Serializable, Value};

const LEAF: u32 = 0x10;
const WRAP: u32 = 0x11;
const LIST: u32 = 0x12;

static ROWS: &[VariantDescriptor] = &[
    VariantDescriptor { id: LEAF, name: "leaf", type_name: "Node", fields: &[] },
    VariantDescriptor {
        id: WRAP,
        name: "wrap",
        type_name: "Node",
        fields: &[FieldDescriptor {
            name: "inner",
            kind: FieldKind::Value { ty: FieldType::Boxed("Node"), flag: None },
        }],
    },
    VariantDescriptor {
        id: LIST,
        name: "list",
        type_name: "List",
        fields: &[FieldDescriptor {
            name: "items",
            kind: FieldKind::Value { ty: FieldType::Vector(&FieldType::Long), flag: None },
        }],
    },
];

fn nested(levels: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(4 * (levels + 1));
    for _ in 0..levels {
        WRAP.serialize(&mut bytes);
    }
    LEAF.serialize(&mut bytes);
    bytes
}

#[test]
fn moderate_nesting_decodes() {
    let reg = Registry::new(ROWS, &[]);
    let bytes = nested(10);
    let node = Decoder::with_registry(&reg, &bytes).read_boxed("Node").unwrap();
    assert_eq!(node.name(), "wrap");
    assert_eq!(node.to_bytes(), bytes);
}

#[test]
fn deep_nesting_is_rejected() {
    let reg = Registry::new(ROWS, &[]);
    let bytes = nested(100_000);
    assert_eq!(
        Decoder::with_registry(&reg, &bytes).read_boxed("Node"),
        Err(Error::DepthExceeded { limit: 64 })
    );
}

#[test]
fn custom_depth_limit() {
    let reg = Registry::new(ROWS, &[]);
    let limits = DecodeLimits { max_depth: 4, ..DecodeLimits::default() };

    let ok = nested(3);
    assert!(Decoder::with_registry(&reg, &ok).limits(limits).read_boxed("Node").is_ok());

    let deep = nested(4);
    assert_eq!(
        Decoder::with_registry(&reg, &deep).limits(limits).read_boxed("Node"),
        Err(Error::DepthExceeded { limit: 4 })
    );
}

fn list_header(count: i32) -> Vec<u8> {
    let mut bytes = Vec::new();
    LIST.serialize(&mut bytes);
    tlwire::consts::VECTOR_ID.serialize(&mut bytes);
    count.serialize(&mut bytes);
    bytes
}

#[test]
fn absurd_count_is_rejected() {
    let reg = Registry::new(ROWS, &[]);
    let bytes = list_header(i32::MAX);
    assert_eq!(
        Decoder::with_registry(&reg, &bytes).read_boxed("List"),
        Err(Error::VectorTooLong { len: i32::MAX as usize })
    );
}

#[test]
fn count_beyond_input_is_eof() {
    let reg = Registry::new(ROWS, &[]);
    let mut bytes = list_header(1000);
    bytes.extend([0u8; 16]);
    assert_eq!(Decoder::with_registry(&reg, &bytes).read_boxed("List"), Err(Error::UnexpectedEof));
}

#[test]
fn custom_vector_limit() {
    let reg = Registry::new(ROWS, &[]);
    let limits = DecodeLimits { max_vector_len: 2, ..DecodeLimits::default() };
    let list = ObjectBuilder::new(&ROWS[2])
        .set("items", Value::vector([1i64, 2, 3]))
        .build()
        .unwrap();
    let bytes = list.to_bytes();

    assert_eq!(
        Decoder::with_registry(&reg, &bytes).limits(limits).read_boxed("List"),
        Err(Error::VectorTooLong { len: 3 })
    );
    assert_eq!(Decoder::with_registry(&reg, &bytes).read_boxed("List"), Ok(list));
}

#[test]
fn built_objects_nest() {
    let leaf = ObjectBuilder::new(&ROWS[0]).build().unwrap();
    let wrapped = ObjectBuilder::new(&ROWS[1]).set("inner", leaf).build().unwrap();
    assert_eq!(wrapped.to_bytes(), nested(1));
    assert_eq!(wrapped.to_string(), "wrap { inner: leaf }");
}
