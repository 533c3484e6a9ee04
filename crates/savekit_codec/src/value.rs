//! Dynamic document value type.

use crate::document::Document;
use glam::{IVec2, IVec3, Mat4, Quat, Vec2, Vec3, Vec4};

/// An RGBA color with float channels, nominally in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from all four channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

/// A dynamically typed value stored in a [`Document`].
///
/// The set of variants is closed: every variant has a fixed text shape,
/// either a JSON scalar, an array, a nested object, or the object shape of
/// one of the math-type converters.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text string.
    String(String),
    /// 2D float vector.
    Vector2(Vec2),
    /// 3D float vector.
    Vector3(Vec3),
    /// 4D float vector.
    Vector4(Vec4),
    /// 2D integer vector.
    Vector2Int(IVec2),
    /// 3D integer vector.
    Vector3Int(IVec3),
    /// RGBA color.
    Color(Color),
    /// Rotation quaternion.
    Quaternion(Quat),
    /// 4x4 matrix.
    Matrix4x4(Mat4),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Nested document.
    Document(Document),
}

impl Value {
    /// Short name of the variant, used in log messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Vector2(_) => "Vector2",
            Value::Vector3(_) => "Vector3",
            Value::Vector4(_) => "Vector4",
            Value::Vector2Int(_) => "Vector2Int",
            Value::Vector3Int(_) => "Vector3Int",
            Value::Color(_) => "Color",
            Value::Quaternion(_) => "Quaternion",
            Value::Matrix4x4(_) => "Matrix4x4",
            Value::List(_) => "list",
            Value::Document(_) => "document",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, if it is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get this value as a nested document, if it is one.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Get this value as a mutable nested document, if it is one.
    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

/// Conversion out of a [`Value`] for typed document reads.
///
/// Implementations match the stored variant directly. Integer targets accept
/// [`Value::Int`] when it fits the target range; float targets accept only
/// [`Value::Float`]. There is no widening between integers and floats.
pub trait FromValue: Sized {
    /// Converts the value, or returns `None` if the type does not match.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! int_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    value.as_int().and_then(|n| <$ty>::try_from(n).ok())
                }
            }
        )*
    };
}

int_from_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_float().map(|n| n as f32)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for Document {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_document().cloned()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_list()?.iter().map(T::from_value).collect()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::Vector2(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vector3(v)
    }
}

impl From<Vec4> for Value {
    fn from(v: Vec4) -> Self {
        Value::Vector4(v)
    }
}

impl From<IVec2> for Value {
    fn from(v: IVec2) -> Self {
        Value::Vector2Int(v)
    }
}

impl From<IVec3> for Value {
    fn from(v: IVec3) -> Self {
        Value::Vector3Int(v)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

impl From<Quat> for Value {
    fn from(q: Quat) -> Self {
        Value::Quaternion(q)
    }
}

impl From<Mat4> for Value {
    fn from(m: Mat4) -> Self {
        Value::Matrix4x4(m)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Document(doc)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}
