//! Benchmark utilities.

#![warn(missing_docs)]

use rand::Rng;
use savekit_codec::glam::{Quat, Vec3};
use savekit_codec::{CompactId, Document, Key, Value};

/// Generate random printable text of the specified length.
pub fn random_text(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

/// A document of `entities` records keyed by compact id, each holding a
/// transform and a few scalars, the shape of a typical level save.
pub fn entity_document(entities: usize) -> Document {
    let mut rng = rand::thread_rng();
    let mut doc = Document::with_capacity(entities);
    for i in 0..entities {
        let mut entity = Document::new();
        entity
            .set(Key::from_string("name").with_comment("display name"), random_text(12))
            .set("hp", rng.gen_range(0..1000i64))
            .set("speed", rng.gen::<f64>())
            .set("alive", rng.gen::<bool>())
            .set(
                "position",
                Vec3::new(rng.gen(), rng.gen(), rng.gen()) * 100.0,
            )
            .set("rotation", Quat::from_rotation_y(rng.gen::<f32>()))
            .set(
                "tags",
                Value::List(vec![Value::from("npc"), Value::Int(i as i64)]),
            );
        doc.set(Key::from_compact(CompactId::new()), entity);
    }
    doc
}

/// A document nested `depth` levels deep with `width` keys per level.
pub fn nested_document(depth: usize, width: usize) -> Document {
    (0..width)
        .map(|i| {
            let value = if depth == 0 {
                Value::from("leaf")
            } else {
                Value::Document(nested_document(depth - 1, width))
            };
            (format!("key_{i}"), value)
        })
        .collect()
}
