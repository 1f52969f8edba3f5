//! Labeled color records read from a JSON array

use crate::model::{Position, DIMS};
use anyhow::{anyhow, bail, Context};
use serde_json::{Map, Value};
use std::path::Path;

/// Field names used to pull the label and color vector out of each record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    /// String field naming the entity (e.g. a state)
    pub label_field: String,
    /// Three-element numeric array (e.g. an average RGB triple)
    pub vector_field: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            label_field: "state".to_string(),
            vector_field: "avg_rgb".to_string(),
        }
    }
}

/// A labeled point together with any other fields the record carried
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub label: String,
    pub position: [f64; DIMS],
    /// Remaining record fields, untouched (thumbnails, names, ...)
    pub attributes: Map<String, Value>,
}

impl Point {
    pub fn new(label: impl Into<String>, position: [f64; DIMS]) -> Self {
        Self {
            label: label.into(),
            position,
            attributes: Map::new(),
        }
    }
}

impl Position for Point {
    fn position(&self) -> [f64; DIMS] {
        self.position
    }
}

/// Load labeled points from a JSON file
///
/// # Arguments
/// * `file_path` - Path to a JSON array of objects
/// * `schema` - Which fields hold the label and the 3-vector
///
/// # Returns
/// * Points in file order
pub fn load_points(
    file_path: impl AsRef<Path>,
    schema: &RecordSchema,
) -> crate::Result<Vec<Point>> {
    let file_path = file_path.as_ref();
    let text = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    parse_points(&text, schema)
        .with_context(|| format!("Invalid records in {}", file_path.display()))
}

/// Parse labeled points from JSON text
pub fn parse_points(json: &str, schema: &RecordSchema) -> crate::Result<Vec<Point>> {
    let value: Value = serde_json::from_str(json).context("Input is not valid JSON")?;
    let records = match value {
        Value::Array(records) => records,
        _ => bail!("Expected a JSON array of records"),
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| point_from_record(index, record, schema))
        .collect()
}

fn point_from_record(index: usize, record: Value, schema: &RecordSchema) -> crate::Result<Point> {
    let mut attributes = match record {
        Value::Object(fields) => fields,
        other => bail!("Record {} is not an object: {}", index, other),
    };

    let label = match attributes.remove(&schema.label_field) {
        Some(Value::String(label)) => label,
        Some(other) => bail!(
            "Record {}: field '{}' must be a string, got {}",
            index,
            schema.label_field,
            other
        ),
        None => bail!("Record {}: missing field '{}'", index, schema.label_field),
    };

    let raw_vector = attributes
        .remove(&schema.vector_field)
        .ok_or_else(|| anyhow!("Record {}: missing field '{}'", index, schema.vector_field))?;
    let position = parse_vector(&raw_vector).with_context(|| {
        format!(
            "Record {} ('{}'): bad field '{}'",
            index, label, schema.vector_field
        )
    })?;

    Ok(Point {
        label,
        position,
        attributes,
    })
}

fn parse_vector(value: &Value) -> crate::Result<[f64; DIMS]> {
    let items = value
        .as_array()
        .ok_or_else(|| anyhow!("expected an array, got {}", value))?;
    if items.len() != DIMS {
        bail!("expected exactly {} numbers, got {}", DIMS, items.len());
    }

    let mut vector = [0.0; DIMS];
    for (slot, item) in vector.iter_mut().zip(items.iter()) {
        *slot = item
            .as_f64()
            .ok_or_else(|| anyhow!("expected a number, got {}", item))?;
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FLAGS: &str = r#"[
        {"state": "Alaska", "avg_rgb": [40.5, 62.0, 140.25], "thumbnail": "flags/ak.png"},
        {"state": "Maryland", "avg_rgb": [160, 90, 40]}
    ]"#;

    #[test]
    fn test_parse_points_keeps_extra_fields() {
        let points = parse_points(FLAGS, &RecordSchema::default()).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "Alaska");
        assert_eq!(points[0].position, [40.5, 62.0, 140.25]);
        assert_eq!(points[0].attributes["thumbnail"], "flags/ak.png");
        assert_eq!(points[1].position, [160.0, 90.0, 40.0]);
        assert!(points[1].attributes.is_empty());
    }

    #[test]
    fn test_custom_schema() {
        let json = r#"[{"name": "teal", "rgb": [0, 128, 128]}]"#;
        let schema = RecordSchema {
            label_field: "name".to_string(),
            vector_field: "rgb".to_string(),
        };
        let points = parse_points(json, &schema).unwrap();
        assert_eq!(points[0].label, "teal");
        assert_eq!(points[0].position(), [0.0, 128.0, 128.0]);
    }

    #[test]
    fn test_malformed_records() {
        let schema = RecordSchema::default();
        assert!(parse_points(r#"{"state": "Ohio"}"#, &schema).is_err());
        assert!(parse_points(r#"[{"avg_rgb": [1, 2, 3]}]"#, &schema).is_err());
        assert!(parse_points(r#"[{"state": "Ohio"}]"#, &schema).is_err());
        assert!(parse_points(r#"[{"state": "Ohio", "avg_rgb": [1, 2]}]"#, &schema).is_err());
        assert!(parse_points(r#"[{"state": "Ohio", "avg_rgb": [1, "x", 3]}]"#, &schema).is_err());

        let err = parse_points(r#"[{"state": 5, "avg_rgb": [1, 2, 3]}]"#, &schema).unwrap_err();
        assert!(err.to_string().contains("Record 0"));
    }

    #[test]
    fn test_load_points_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", FLAGS).unwrap();

        let points = load_points(file.path(), &RecordSchema::default()).unwrap();
        assert_eq!(points.len(), 2);

        assert!(load_points("does/not/exist.json", &RecordSchema::default()).is_err());
    }

    #[test]
    fn test_empty_array_is_not_a_load_error() {
        let points = parse_points("[]", &RecordSchema::default()).unwrap();
        assert!(points.is_empty());
    }
}
