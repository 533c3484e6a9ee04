//! Property-based test generators using proptest.
//!
//! Provides strategies for keys, values, documents and codec settings.
//! Generated floats are finite so generated documents compare equal after
//! a round trip.

use proptest::prelude::*;
use savekit_codec::glam::{IVec2, IVec3, Mat4, Quat, Vec2, Vec3, Vec4};
use savekit_codec::{
    CodecSettings, CodecVariant, Color, CompactId, Document, Key, TypeNameHandling, Value,
};

/// Strategy for compact ids.
pub fn compact_id_strategy() -> impl Strategy<Value = CompactId> {
    prop::array::uniform16(any::<u8>()).prop_map(CompactId::from_bytes)
}

/// Strategy for string keys that never look like compact ids.
pub fn string_key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[g-zA-Z_][a-zA-Z0-9_ .-]{0,15}").expect("Invalid regex")
}

/// Strategy for keys, mostly strings with some compact ids.
pub fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        4 => string_key_strategy().prop_map(Key::from_string),
        1 => compact_id_strategy().prop_map(Key::from_compact),
    ]
}

fn component() -> impl Strategy<Value = f32> {
    -1.0e6f32..1.0e6f32
}

/// Strategy for the math-type values.
pub fn math_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (component(), component()).prop_map(|(x, y)| Value::from(Vec2::new(x, y))),
        prop::array::uniform3(component()).prop_map(|a| Value::from(Vec3::from_array(a))),
        prop::array::uniform4(component()).prop_map(|a| Value::from(Vec4::from_array(a))),
        prop::array::uniform2(any::<i32>()).prop_map(|a| Value::from(IVec2::from_array(a))),
        prop::array::uniform3(any::<i32>()).prop_map(|a| Value::from(IVec3::from_array(a))),
        prop::array::uniform4(0.0f32..=1.0).prop_map(|[r, g, b, a]| Value::from(Color::new(r, g, b, a))),
        prop::array::uniform4(component()).prop_map(|a| Value::from(Quat::from_array(a))),
        prop::array::uniform16(component()).prop_map(|a| Value::from(Mat4::from_cols_array(&a))),
    ]
}

/// Strategy for scalar values with finite floats.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e12f64..1.0e12f64).prop_map(Value::Float),
        "\\PC{0,24}".prop_map(Value::String),
    ]
}

/// Strategy for values of any shape, nested up to three levels.
///
/// Math values only survive a round trip when type names are written, so
/// they are included only when `with_math` is set.
pub fn value_strategy(with_math: bool) -> BoxedStrategy<Value> {
    let leaf = if with_math {
        prop_oneof![3 => scalar_strategy(), 1 => math_value_strategy()].boxed()
    } else {
        scalar_strategy().boxed()
    };
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::vec((key_strategy(), inner), 0..6)
                .prop_map(|entries| Value::Document(entries.into_iter().collect())),
        ]
    })
    .boxed()
}

/// Strategy for documents with up to `max_keys` top-level entries.
pub fn document_strategy(with_math: bool, max_keys: usize) -> impl Strategy<Value = Document> {
    prop::collection::vec((key_strategy(), value_strategy(with_math)), 0..=max_keys)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Strategy for one of the six codec variants.
pub fn variant_strategy() -> impl Strategy<Value = CodecVariant> {
    prop::sample::select(CodecVariant::ALL.to_vec())
}

/// Strategy for codec settings over every variant and type-name policy.
pub fn codec_settings_strategy() -> impl Strategy<Value = CodecSettings> {
    (variant_strategy(), any::<bool>()).prop_map(|(variant, typed)| {
        variant.settings().type_names(if typed {
            TypeNameHandling::Auto
        } else {
            TypeNameHandling::None
        })
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn string_keys_never_parse_as_compact(name in string_key_strategy()) {
            prop_assert!(Key::parse(&name).compact_id().is_none());
        }

        #[test]
        fn compact_keys_render_as_hex(id in compact_id_strategy()) {
            let key = Key::from_compact(id);
            prop_assert_eq!(key.to_display_string().len(), savekit_codec::HEX_LEN);
        }

        #[test]
        fn generated_floats_are_finite(value in value_strategy(false)) {
            if let Value::Float(f) = value {
                prop_assert!(f.is_finite());
            }
        }
    }
}
