//! Inspect command implementation.

use super::{format_size, read_document, read_settings, CmdResult, CommentsArg, CryptoArgs};
use savekit_codec::{Document, Value};
use serde::Serialize;
use serde_json::{json, Map, Value as Json};
use std::path::Path;

/// Save file inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Save file path.
    pub path: String,
    /// File size in bytes.
    pub size: u64,
    /// Whether the file was decrypted.
    pub encrypted: bool,
    /// Number of top-level keys.
    pub key_count: usize,
    /// Top-level entries in document order.
    pub entries: Vec<Entry>,
}

/// A single key/value pair.
#[derive(Debug, Serialize)]
pub struct Entry {
    /// Key display string.
    pub key: String,
    /// Key comment, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Value kind.
    pub kind: &'static str,
    /// Value rendered as JSON.
    pub value: Json,
}

/// Runs the inspect command.
pub fn run(path: &Path, comments: CommentsArg, crypto: &CryptoArgs, format: &str) -> CmdResult<()> {
    let settings = read_settings(comments, crypto);
    let doc = read_document(path, &settings)?;
    let size = std::fs::metadata(path)?.len();

    let result = InspectResult {
        path: path.display().to_string(),
        size,
        encrypted: settings.encryption.is_some(),
        key_count: doc.len(),
        entries: entries(&doc),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result, &doc),
    }
    Ok(())
}

fn entries(doc: &Document) -> Vec<Entry> {
    doc.iter()
        .map(|(key, value)| Entry {
            key: key.to_display_string(),
            comment: key.comment().map(str::to_string),
            kind: value.kind(),
            value: to_json(value),
        })
        .collect()
}

fn float(f: f64) -> Json {
    serde_json::Number::from_f64(f).map_or_else(|| Json::String(f.to_string()), Json::Number)
}

fn floats(values: &[f32]) -> Json {
    Json::Array(values.iter().map(|f| float(f64::from(*f))).collect())
}

/// Renders a value as JSON. Non-finite floats become strings and math
/// types become arrays of their components.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => json!(i),
        Value::Float(f) => float(*f),
        Value::String(s) => Json::String(s.clone()),
        Value::Vector2(v) => floats(&v.to_array()),
        Value::Vector3(v) => floats(&v.to_array()),
        Value::Vector4(v) => floats(&v.to_array()),
        Value::Vector2Int(v) => json!(v.to_array()),
        Value::Vector3Int(v) => json!(v.to_array()),
        Value::Color(c) => floats(&[c.r, c.g, c.b, c.a]),
        Value::Quaternion(q) => floats(&q.to_array()),
        Value::Matrix4x4(m) => floats(&m.transpose().to_cols_array()),
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Document(doc) => {
            let mut map = Map::new();
            for (key, value) in doc {
                map.insert(key.to_display_string(), to_json(value));
            }
            Json::Object(map)
        }
    }
}

fn print_text_output(result: &InspectResult, doc: &Document) {
    println!("Save File: {}", result.path);
    println!("Size:      {}", format_size(result.size));
    println!("Encrypted: {}", if result.encrypted { "yes" } else { "no" });
    println!("Keys:      {}", result.key_count);
    println!();
    print_tree(doc, 1);
}

fn print_tree(doc: &Document, depth: usize) {
    let pad = "  ".repeat(depth);
    for (key, value) in doc {
        if let Some(comment) = key.comment() {
            println!("{pad}# {comment}");
        }
        match value {
            Value::Document(child) => {
                println!("{pad}{key} (document, {} keys)", child.len());
                print_tree(child, depth + 1);
            }
            Value::List(items) => println!("{pad}{key} (list, {} items)", items.len()),
            other => println!("{pad}{key} ({}) = {}", other.kind(), to_json(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savekit_codec::glam::{IVec2, Mat4, Vec3};
    use savekit_codec::Key;

    #[test]
    fn scalars_render_as_json() {
        assert_eq!(to_json(&Value::Int(3)), json!(3));
        assert_eq!(to_json(&Value::Float(0.5)), json!(0.5));
        assert_eq!(to_json(&Value::Float(f64::NAN)), json!("NaN"));
        assert_eq!(to_json(&Value::Null), Json::Null);
    }

    #[test]
    fn math_types_render_as_arrays() {
        assert_eq!(to_json(&Value::Vector3(Vec3::new(1.0, 2.0, 3.0))), json!([1.0, 2.0, 3.0]));
        assert_eq!(to_json(&Value::Vector2Int(IVec2::new(4, -5))), json!([4, -5]));
        let m = to_json(&Value::Matrix4x4(Mat4::IDENTITY));
        assert_eq!(m.as_array().map(Vec::len), Some(16));
    }

    #[test]
    fn entries_keep_order_and_comments() {
        let mut doc = Document::new();
        doc.set(Key::from_string("z").with_comment("last letter"), 1)
            .set("a", "x");
        let list = entries(&doc);
        assert_eq!(list[0].key, "z");
        assert_eq!(list[0].comment.as_deref(), Some("last letter"));
        assert_eq!(list[1].kind, "string");
    }
}
