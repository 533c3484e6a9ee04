//! Round-trip and key properties of the text codec across all variants.

use proptest::prelude::*;
use savekit_codec::{
    CodecSettings, CodecVariant, CommentPlacement, CompactId, Document, Key, TypeNameHandling,
    Value,
};
use savekit_testkit::prelude::*;

fn typed(variant: CodecVariant) -> CodecSettings {
    variant.settings().type_names(TypeNameHandling::Auto)
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn untyped_documents_round_trip(doc in document_strategy(false, 12), variant in variant_strategy()) {
        let settings = variant.settings();
        let text = doc.to_text(&settings).unwrap();
        prop_assert_eq!(Document::from_text(&text, &settings).unwrap(), doc);
    }

    #[test]
    fn typed_documents_round_trip(doc in document_strategy(true, 12), variant in variant_strategy()) {
        let settings = typed(variant);
        let text = doc.to_text(&settings).unwrap();
        prop_assert_eq!(Document::from_text(&text, &settings).unwrap(), doc);
    }

    #[test]
    fn encoding_is_deterministic(doc in document_strategy(true, 8), settings in codec_settings_strategy()) {
        prop_assert_eq!(doc.to_text(&settings).unwrap(), doc.to_text(&settings).unwrap());
    }

    #[test]
    fn compact_variants_are_single_line(doc in document_strategy(false, 8)) {
        for variant in [CodecVariant::Compact, CodecVariant::CompactCommentsBefore, CodecVariant::CompactCommentsAfter] {
            let text = doc.to_text(&variant.settings()).unwrap();
            prop_assert!(!text.contains('\n'));
        }
    }

    #[test]
    fn comments_round_trip_when_placed(
        entries in prop::collection::vec((string_key_strategy(), "[a-zA-Z0-9 ,.!?]{1,20}", any::<i64>()), 1..8),
    ) {
        let mut doc = Document::new();
        for (name, comment, value) in &entries {
            doc.set(Key::from_string(name.as_str()).with_comment(comment), *value);
        }
        for variant in CodecVariant::ALL {
            let settings = variant.settings();
            let back = Document::from_text(&doc.to_text(&settings).unwrap(), &settings).unwrap();
            prop_assert_eq!(&back, &doc);
            for key in doc.keys() {
                let expected = match variant.comments() {
                    CommentPlacement::None => None,
                    _ => key.comment().map(str::trim).filter(|c| !c.is_empty()),
                };
                prop_assert_eq!(back.comment(key), expected);
            }
        }
    }

    #[test]
    fn lookups_miss_without_inserting(doc in document_strategy(false, 6), name in "[g-z]{20}") {
        let before = doc.len();
        prop_assert_eq!(doc.get(name.as_str(), 42i64), 42);
        prop_assert!(doc.try_get::<i64>(name.as_str()).is_none());
        prop_assert_eq!(doc.len(), before);
    }
}

#[test]
fn key_equality_rules() {
    let id = CompactId::from_bytes([0xab; 16]);

    assert_eq!(Key::from_string("hp"), Key::from_string("hp"));
    assert_ne!(Key::from_string("hp"), Key::from_string("HP"));

    assert_eq!(Key::from_compact(id), Key::from_compact(id));
    assert_ne!(Key::from_compact(id), Key::from_compact(CompactId::new()));

    assert_eq!(Key::from_compact(id), Key::from_string(id.to_hex()));
    assert_eq!(Key::parse(&id.to_hex()).compact_id(), Some(id));
    assert_ne!(Key::from_compact(id), Key::from_string("ab"));

    assert_eq!(Key::from_string("a").with_comment("x"), Key::from_string("a"));
}

#[test]
fn insertion_order_survives_overwrite() {
    let mut doc = Document::new();
    doc.set("k3", 3).set("k1", 1).set("k2", 2);
    doc.set("k1", 10);

    let keys: Vec<String> = doc.keys().map(Key::to_display_string).collect();
    assert_eq!(keys, ["k3", "k1", "k2"]);
    assert_eq!(doc.get("k1", 0), 10);

    for variant in CodecVariant::ALL {
        let settings = variant.settings();
        let back = Document::from_text(&doc.to_text(&settings).unwrap(), &settings).unwrap();
        let keys: Vec<String> = back.keys().map(Key::to_display_string).collect();
        assert_eq!(keys, ["k3", "k1", "k2"]);
    }
}

#[test]
fn scenario_documents_round_trip_everywhere() {
    let world = scenarios::world();
    for variant in CodecVariant::ALL {
        let settings = typed(variant);
        let back = Document::from_text(&world.to_text(&settings).unwrap(), &settings).unwrap();
        assert_eq!(back, world, "variant {variant:?}");
        if variant.comments() != CommentPlacement::None {
            assert_eq!(back.comment("version"), Some("save format revision"));
        }
    }
}

#[test]
fn untyped_math_reads_back_through_typed_getters() {
    let transforms = scenarios::transforms();
    let settings = CodecVariant::Indented.settings();
    let back = Document::from_text(&transforms.to_text(&settings).unwrap(), &settings).unwrap();

    assert!(matches!(back.get_value("position"), Some(Value::Document(_))));
    assert_eq!(
        back.try_get("position"),
        transforms.try_get::<savekit_codec::glam::Vec3>("position")
    );
    assert_eq!(
        back.try_get("local_to_world"),
        transforms.try_get::<savekit_codec::glam::Mat4>("local_to_world")
    );
}
