// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structural validation of content documents.

use gm_core::content::{ContentSchema, FieldKind, SchemaField, ValidationIssue};
use serde_json::Value;

/// Checks `document` against `schema`, appending every problem to `issues`.
///
/// Returns `true` when no error was found. Keys the schema does not declare
/// are accepted.
pub fn validate_document(
    schema: &ContentSchema,
    document: &Value,
    issues: &mut Vec<ValidationIssue>,
) -> bool {
    let before = issues.len();
    match document {
        Value::Object(_) => validate_fields(&schema.fields, document, "", issues),
        _ => issues.push(ValidationIssue::error(
            schema.content_type.as_str(),
            "Root must be an object",
        )),
    }
    !issues[before..].iter().any(|issue| issue.is_error)
}

fn validate_fields(fields: &[SchemaField], object: &Value, prefix: &str, issues: &mut Vec<ValidationIssue>) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match object.get(&field.name) {
            Some(value) => validate_value(field, value, &path, issues),
            None if field.required => {
                issues.push(ValidationIssue::error(path, "Required field missing"));
            }
            None => {}
        }
    }
}

fn validate_value(field: &SchemaField, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    match field.kind {
        FieldKind::String => {
            let Some(text) = value.as_str() else {
                issues.push(ValidationIssue::error(path, "Expected string"));
                return;
            };
            if let Some(min) = field.min_length {
                if text.len() < min {
                    issues.push(ValidationIssue::error(path, format!("Minimum length {min}")));
                }
            }
            if let Some(max) = field.max_length {
                if text.len() > max {
                    issues.push(ValidationIssue::error(path, format!("Maximum length {max}")));
                }
            }
            if !field.enum_values.is_empty() && !field.enum_values.iter().any(|allowed| allowed == text) {
                issues.push(ValidationIssue::error(path, "Value not in allowed set"));
            }
        }
        FieldKind::Integer => {
            if !(value.is_i64() || value.is_u64()) {
                issues.push(ValidationIssue::error(path, "Expected integer"));
                return;
            }
            check_range(field, value, path, issues);
        }
        FieldKind::Number => {
            if !value.is_number() {
                issues.push(ValidationIssue::error(path, "Expected number"));
                return;
            }
            check_range(field, value, path, issues);
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                issues.push(ValidationIssue::error(path, "Expected boolean"));
            }
        }
        FieldKind::Object => {
            if !value.is_object() {
                issues.push(ValidationIssue::error(path, "Expected object"));
                return;
            }
            validate_fields(&field.properties, value, path, issues);
        }
        FieldKind::Array => {
            let Some(elements) = value.as_array() else {
                issues.push(ValidationIssue::error(path, "Expected array"));
                return;
            };
            if let Some(element) = &field.element {
                for (index, item) in elements.iter().enumerate() {
                    validate_value(element, item, &format!("{path}[{index}]"), issues);
                }
            }
        }
    }
}

fn check_range(field: &SchemaField, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(number) = value.as_f64() else {
        return;
    };
    if let Some(min) = field.minimum {
        if number < min {
            issues.push(ValidationIssue::error(path, format!("Minimum {min}")));
        }
    }
    if let Some(max) = field.maximum {
        if number > max {
            issues.push(ValidationIssue::error(path, format!("Maximum {max}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn field(name: &str, kind: FieldKind) -> SchemaField {
        SchemaField {
            name: name.into(),
            kind,
            ..SchemaField::default()
        }
    }

    fn item_schema() -> ContentSchema {
        let mut id = field("id", FieldKind::String);
        id.required = true;
        id.min_length = Some(2);

        let mut rarity = field("rarity", FieldKind::String);
        rarity.enum_values = vec!["common".into(), "rare".into()];

        let mut damage = field("damage", FieldKind::Integer);
        damage.minimum = Some(0.0);
        damage.maximum = Some(100.0);

        let mut stats = field("stats", FieldKind::Object);
        stats.properties = vec![field("weight", FieldKind::Number), field("stackable", FieldKind::Boolean)];

        let mut tags = field("tags", FieldKind::Array);
        tags.element = Some(Box::new(field("", FieldKind::String)));

        ContentSchema {
            content_type: "item".into(),
            display_name: "Item".into(),
            version: 1,
            source_file: PathBuf::from("content/schemas/item.json"),
            data_directories: vec!["content/data/items/".into()],
            fields: vec![id, rarity, damage, stats, tags],
        }
    }

    fn check(document: Value) -> (bool, Vec<ValidationIssue>) {
        let mut issues = Vec::new();
        let valid = validate_document(&item_schema(), &document, &mut issues);
        (valid, issues)
    }

    #[test]
    fn valid_document_with_extra_keys() {
        let (valid, issues) = check(json!({
            "id": "sword",
            "rarity": "rare",
            "damage": 12,
            "stats": { "weight": 2.5, "stackable": false },
            "tags": ["melee", "steel"],
            "lore": "not declared"
        }));
        assert!(valid);
        assert!(issues.is_empty());
    }

    #[test]
    fn non_object_root() {
        let (valid, issues) = check(json!(["sword"]));
        assert!(!valid);
        assert_eq!(issues, vec![ValidationIssue::error("item", "Root must be an object")]);
    }

    #[test]
    fn missing_required_field() {
        let (valid, issues) = check(json!({ "damage": 3 }));
        assert!(!valid);
        assert_eq!(issues, vec![ValidationIssue::error("id", "Required field missing")]);
    }

    #[test]
    fn constraint_messages_and_paths() {
        let (valid, issues) = check(json!({
            "id": "x",
            "rarity": "legendary",
            "damage": 150,
            "stats": { "weight": "heavy", "stackable": 1 },
            "tags": ["ok", 7]
        }));
        assert!(!valid);
        let found: Vec<(&str, &str)> = issues
            .iter()
            .map(|issue| (issue.path.as_str(), issue.message.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("id", "Minimum length 2"),
                ("rarity", "Value not in allowed set"),
                ("damage", "Maximum 100"),
                ("stats.weight", "Expected number"),
                ("stats.stackable", "Expected boolean"),
                ("tags[1]", "Expected string"),
            ]
        );
    }

    #[test]
    fn integers_reject_fractions() {
        let (valid, issues) = check(json!({ "id": "axe", "damage": 2.5 }));
        assert!(!valid);
        assert_eq!(issues[0].message, "Expected integer");
    }
}
