//! Field-wise converters for the engine math types.
//!
//! Each math type is written as an object of named numeric fields in a
//! fixed order, optionally preceded by a `"$type"` marker. Reading is
//! tolerant: unknown fields and non-numeric values are logged and skipped,
//! and missing fields default to zero.

use crate::document::Document;
use crate::error::CodecResult;
use crate::settings::TypeNameHandling;
use crate::token::{Scalar, TYPE_MARKER};
use crate::value::{Color, FromValue, Value};
use crate::writer::TokenWriter;
use glam::{IVec2, IVec3, Mat4, Quat, Vec2, Vec3, Vec4};
use tracing::warn;

/// The math types that have a converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// [`Vec2`]: `x, y`
    Vector2,
    /// [`Vec3`]: `x, y, z`
    Vector3,
    /// [`Vec4`]: `x, y, z, w`
    Vector4,
    /// [`IVec2`]: `x, y`
    Vector2Int,
    /// [`IVec3`]: `x, y, z`
    Vector3Int,
    /// [`Color`]: `r, g, b, a`
    Color,
    /// [`Quat`]: `x, y, z, w`
    Quaternion,
    /// [`Mat4`]: `m00` through `m33`, row by row.
    Matrix4x4,
}

const XY: &[&str] = &["x", "y"];
const XYZ: &[&str] = &["x", "y", "z"];
const XYZW: &[&str] = &["x", "y", "z", "w"];
const RGBA: &[&str] = &["r", "g", "b", "a"];
const MATRIX: &[&str] = &[
    "m00", "m01", "m02", "m03", "m10", "m11", "m12", "m13", "m20", "m21", "m22", "m23", "m30",
    "m31", "m32", "m33",
];

impl Shape {
    /// Every shape.
    pub const ALL: [Shape; 8] = [
        Shape::Vector2,
        Shape::Vector3,
        Shape::Vector4,
        Shape::Vector2Int,
        Shape::Vector3Int,
        Shape::Color,
        Shape::Quaternion,
        Shape::Matrix4x4,
    ];

    /// The name written in the `"$type"` marker.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Shape::Vector2 => "Vector2",
            Shape::Vector3 => "Vector3",
            Shape::Vector4 => "Vector4",
            Shape::Vector2Int => "Vector2Int",
            Shape::Vector3Int => "Vector3Int",
            Shape::Color => "Color",
            Shape::Quaternion => "Quaternion",
            Shape::Matrix4x4 => "Matrix4x4",
        }
    }

    /// Looks up a shape by type marker.
    ///
    /// Assembly-qualified and namespaced names such as
    /// `"UnityEngine.Vector3, UnityEngine.CoreModule"` are accepted too.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Shape> {
        let name = name.split(',').next().unwrap_or(name).trim();
        let name = name.rsplit('.').next().unwrap_or(name);
        Shape::ALL.into_iter().find(|s| s.type_name() == name)
    }

    /// Field names in write order.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Shape::Vector2 | Shape::Vector2Int => XY,
            Shape::Vector3 | Shape::Vector3Int => XYZ,
            Shape::Vector4 | Shape::Quaternion => XYZW,
            Shape::Color => RGBA,
            Shape::Matrix4x4 => MATRIX,
        }
    }

    /// Returns true for the integer vector shapes.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Shape::Vector2Int | Shape::Vector3Int)
    }

    /// Returns the shape of a value, if it has a converter.
    #[must_use]
    pub fn of(value: &Value) -> Option<Shape> {
        Some(match value {
            Value::Vector2(_) => Shape::Vector2,
            Value::Vector3(_) => Shape::Vector3,
            Value::Vector4(_) => Shape::Vector4,
            Value::Vector2Int(_) => Shape::Vector2Int,
            Value::Vector3Int(_) => Shape::Vector3Int,
            Value::Color(_) => Shape::Color,
            Value::Quaternion(_) => Shape::Quaternion,
            Value::Matrix4x4(_) => Shape::Matrix4x4,
            _ => return None,
        })
    }

    /// Rebuilds a value of this shape from a document holding its fields.
    ///
    /// This is how converter values come back when they were written
    /// without a type marker. Returns `None` if the document contains none
    /// of the shape's fields or names a different type.
    #[must_use]
    pub fn from_document(self, doc: &Document) -> Option<Value> {
        let mut fields = FieldSet::new(self);
        let mut matched = false;
        for (key, value) in doc {
            let Some(name) = key.as_str() else {
                warn!(shape = self.type_name(), key = %key, "ignoring non-field key");
                continue;
            };
            if name == TYPE_MARKER {
                match value.as_str().and_then(Shape::from_type_name) {
                    Some(named) if named == self => continue,
                    _ => return None,
                }
            }
            matched |= fields.assign_value(name, value);
        }
        matched.then(|| fields.finish())
    }
}

/// Collects fields while a converter object is read.
#[derive(Debug)]
pub(crate) struct FieldSet {
    shape: Shape,
    floats: [f32; 16],
    ints: [i32; 3],
}

impl FieldSet {
    pub(crate) fn new(shape: Shape) -> Self {
        Self {
            shape,
            floats: [0.0; 16],
            ints: [0; 3],
        }
    }

    fn slot(&self, name: &str) -> Option<usize> {
        let idx = self.shape.fields().iter().position(|f| *f == name);
        if idx.is_none() {
            warn!(shape = self.shape.type_name(), field = name, "ignoring unknown field");
        }
        idx
    }

    /// Assigns a field from a scalar token.
    pub(crate) fn assign(&mut self, name: &str, scalar: &Scalar) -> bool {
        let Some(idx) = self.slot(name) else {
            return false;
        };
        let ok = if self.shape.is_integer() {
            scalar.as_i32().map(|n| self.ints[idx] = n).is_some()
        } else {
            scalar.as_f32().map(|n| self.floats[idx] = n).is_some()
        };
        if !ok {
            warn!(
                shape = self.shape.type_name(),
                field = name,
                "field is not a number, using 0"
            );
        }
        true
    }

    /// Assigns a field from an already decoded value.
    #[allow(clippy::cast_possible_truncation)]
    fn assign_value(&mut self, name: &str, value: &Value) -> bool {
        let Some(idx) = self.slot(name) else {
            return false;
        };
        let ok = if self.shape.is_integer() {
            let n = match *value {
                Value::Int(n) => i32::try_from(n).ok(),
                Value::Float(f) if f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) => {
                    Some(f as i32)
                }
                _ => None,
            };
            n.map(|n| self.ints[idx] = n).is_some()
        } else {
            let n = match *value {
                Value::Int(n) => Some(n as f32),
                Value::Float(f) => Some(f as f32),
                _ => None,
            };
            n.map(|n| self.floats[idx] = n).is_some()
        };
        if !ok {
            warn!(
                shape = self.shape.type_name(),
                field = name,
                kind = value.kind(),
                "field is not a number, using 0"
            );
        }
        true
    }

    pub(crate) fn finish(self) -> Value {
        let [a, b, c, d, ..] = self.floats;
        let [i, j, k] = self.ints;
        match self.shape {
            Shape::Vector2 => Value::Vector2(Vec2::new(a, b)),
            Shape::Vector3 => Value::Vector3(Vec3::new(a, b, c)),
            Shape::Vector4 => Value::Vector4(Vec4::new(a, b, c, d)),
            Shape::Vector2Int => Value::Vector2Int(IVec2::new(i, j)),
            Shape::Vector3Int => Value::Vector3Int(IVec3::new(i, j, k)),
            Shape::Color => Value::Color(Color::new(a, b, c, d)),
            Shape::Quaternion => Value::Quaternion(Quat::from_xyzw(a, b, c, d)),
            Shape::Matrix4x4 => {
                // Fields are row-major; glam stores columns.
                Value::Matrix4x4(Mat4::from_cols_array(&self.floats).transpose())
            }
        }
    }
}

enum Components {
    Float(Vec<f32>),
    Int(Vec<i32>),
}

fn components(value: &Value) -> Option<Components> {
    Some(match value {
        Value::Vector2(v) => Components::Float(v.to_array().to_vec()),
        Value::Vector3(v) => Components::Float(v.to_array().to_vec()),
        Value::Vector4(v) => Components::Float(v.to_array().to_vec()),
        Value::Vector2Int(v) => Components::Int(v.to_array().to_vec()),
        Value::Vector3Int(v) => Components::Int(v.to_array().to_vec()),
        Value::Color(c) => Components::Float(vec![c.r, c.g, c.b, c.a]),
        Value::Quaternion(q) => Components::Float(q.to_array().to_vec()),
        Value::Matrix4x4(m) => Components::Float(m.transpose().to_cols_array().to_vec()),
        _ => return None,
    })
}

/// Writes a converter value as an object. Returns `Ok(false)` if the value
/// has no converter.
pub(crate) fn write_value(
    writer: &mut TokenWriter,
    value: &Value,
    type_names: TypeNameHandling,
) -> CodecResult<bool> {
    let (Some(shape), Some(parts)) = (Shape::of(value), components(value)) else {
        return Ok(false);
    };
    writer.write_start_object()?;
    if type_names == TypeNameHandling::Auto {
        writer.write_property_name(TYPE_MARKER)?;
        writer.write_string(shape.type_name())?;
    }
    match parts {
        Components::Float(parts) => {
            for (name, n) in shape.fields().iter().zip(parts) {
                writer.write_property_name(name)?;
                writer.write_f32(n)?;
            }
        }
        Components::Int(parts) => {
            for (name, n) in shape.fields().iter().zip(parts) {
                writer.write_property_name(name)?;
                writer.write_int(i64::from(n))?;
            }
        }
    }
    writer.write_end_object()?;
    Ok(true)
}

macro_rules! shaped_from_value {
    ($($ty:ty => $shape:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$shape(v) => Some(*v),
                        Value::Document(doc) => match Shape::$shape.from_document(doc)? {
                            Value::$shape(v) => Some(v),
                            _ => None,
                        },
                        _ => None,
                    }
                }
            }
        )*
    };
}

shaped_from_value! {
    Vec2 => Vector2,
    Vec3 => Vector3,
    Vec4 => Vector4,
    IVec2 => Vector2Int,
    IVec3 => Vector3Int,
    Color => Color,
    Quat => Quaternion,
    Mat4 => Matrix4x4,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Formatting;

    fn write(value: &Value, type_names: TypeNameHandling) -> String {
        let mut w = TokenWriter::new(Formatting::Compact, 2);
        assert!(write_value(&mut w, value, type_names).unwrap());
        w.finish().unwrap()
    }

    #[test]
    fn field_order_and_marker() {
        let v = Value::Vector3(Vec3::new(1.0, 2.5, -3.0));
        assert_eq!(
            write(&v, TypeNameHandling::Auto),
            r#"{"$type":"Vector3","x":1.0,"y":2.5,"z":-3.0}"#
        );
        assert_eq!(
            write(&v, TypeNameHandling::None),
            r#"{"x":1.0,"y":2.5,"z":-3.0}"#
        );
    }

    #[test]
    fn int_vectors_write_integers() {
        let v = Value::Vector2Int(IVec2::new(3, -4));
        assert_eq!(write(&v, TypeNameHandling::None), r#"{"x":3,"y":-4}"#);
    }

    #[test]
    fn color_uses_rgba() {
        let v = Value::Color(Color::new(1.0, 0.5, 0.25, 0.0));
        assert_eq!(
            write(&v, TypeNameHandling::None),
            r#"{"r":1.0,"g":0.5,"b":0.25,"a":0.0}"#
        );
    }

    #[test]
    fn matrix_is_row_major() {
        let m = Mat4::from_cols_array(&[
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        ]);
        let text = write(&Value::Matrix4x4(m), TypeNameHandling::None);
        // Column 0 is (1, 2, 3, 4), so row 0 starts 1, 5, 9, 13.
        assert!(text.starts_with(r#"{"m00":1.0,"m01":5.0,"m02":9.0,"m03":13.0,"m10":2.0"#));
    }

    #[test]
    fn matrix_fields_round_trip() {
        let m = Mat4::from_cols_array(&[
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        ]);
        let mut fields = FieldSet::new(Shape::Matrix4x4);
        let Some(Components::Float(parts)) = components(&Value::Matrix4x4(m)) else {
            panic!("matrix has float components");
        };
        for (name, n) in MATRIX.iter().zip(parts) {
            fields.assign(name, &Scalar::Number(format!("{n:?}")));
        }
        assert_eq!(fields.finish(), Value::Matrix4x4(m));
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let mut fields = FieldSet::new(Shape::Vector3);
        fields.assign("y", &Scalar::Number("2".into()));
        fields.assign("bogus", &Scalar::Number("9".into()));
        fields.assign("z", &Scalar::String("nope".into()));
        assert_eq!(fields.finish(), Value::Vector3(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn type_name_lookup() {
        assert_eq!(Shape::from_type_name("Vector3"), Some(Shape::Vector3));
        assert_eq!(
            Shape::from_type_name("UnityEngine.Quaternion, UnityEngine.CoreModule"),
            Some(Shape::Quaternion)
        );
        assert_eq!(Shape::from_type_name("Vector5"), None);
    }

    #[test]
    fn documents_convert_by_expected_type() {
        let mut doc = Document::new();
        doc.set("x", 1.5).set("y", 2);
        assert_eq!(Vec2::from_value(&Value::Document(doc.clone())), Some(Vec2::new(1.5, 2.0)));
        assert_eq!(
            Vec3::from_value(&Value::Document(doc)),
            Some(Vec3::new(1.5, 2.0, 0.0))
        );

        let mut doc = Document::new();
        doc.set("name", "not a vector");
        assert_eq!(Vec2::from_value(&Value::Document(doc)), None);
    }

    #[test]
    fn documents_with_a_different_marker_do_not_convert() {
        let mut doc = Document::new();
        doc.set("$type", "Color").set("x", 1.0);
        assert_eq!(Vec2::from_value(&Value::Document(doc)), None);
    }
}
