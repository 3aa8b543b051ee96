//! Structured guide body.
//!
//! A body is an ordered list of typed blocks:
//!
//! ```json
//! {"blocks": [
//!   {"type": "heading", "level": 1, "text": "Welcome"},
//!   {"type": "paragraph", "text": "Hi"},
//!   {"type": "list", "items": ["one", "two"]}
//! ]}
//! ```
//!
//! Request bodies arrive as raw JSON and go through [`GuideBody::parse`],
//! which reports every problem with its path (`body.blocks[2].items`) rather
//! than stopping at the first serde error. Parsing only checks the document;
//! the submitted JSON is what gets stored, extra keys included.

use helpcenter_common::FieldError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const FIELD: &str = "body";

/// A validated guide body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideBody {
    /// Blocks in display order.
    pub blocks: Vec<Block>,
}

/// One unit of a guide body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// Section heading, level 1 to 6.
    Heading {
        /// Heading level.
        level: u8,
        /// Heading text.
        text: String,
    },
    /// Plain paragraph.
    Paragraph {
        /// Paragraph text.
        text: String,
    },
    /// Bulleted list.
    List {
        /// List entries.
        items: Vec<String>,
    },
}

impl GuideBody {
    /// Validate raw JSON and build a typed view of it.
    ///
    /// Keys a block type does not define are ignored, not rejected.
    pub fn parse(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let Some(object) = value.as_object() else {
            return Err(vec![FieldError::new(
                FIELD,
                "Body must be an object with a blocks list",
                value.clone(),
                "type_error",
            )]);
        };

        let blocks_path = format!("{FIELD}.blocks");
        let raw_blocks = match object.get("blocks") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(vec![FieldError::new(
                    blocks_path,
                    "Blocks must be a list",
                    other.clone(),
                    "type_error",
                )]);
            }
            None => {
                return Err(vec![FieldError::new(
                    blocks_path,
                    "Body must contain blocks",
                    Value::Null,
                    "missing",
                )]);
            }
        };

        if raw_blocks.is_empty() {
            return Err(vec![FieldError::new(
                blocks_path,
                "Body must contain at least one block",
                Value::Array(Vec::new()),
                "empty_blocks",
            )]);
        }

        let mut blocks = Vec::with_capacity(raw_blocks.len());
        for (i, raw) in raw_blocks.iter().enumerate() {
            let path = format!("{blocks_path}[{i}]");
            if let Some(block) = parse_block(&path, raw, &mut errors) {
                blocks.push(block);
            }
        }

        if errors.is_empty() {
            Ok(Self { blocks })
        } else {
            Err(errors)
        }
    }
}

fn parse_block(path: &str, raw: &Value, errors: &mut Vec<FieldError>) -> Option<Block> {
    let Some(block) = raw.as_object() else {
        errors.push(FieldError::new(
            path,
            "Block must be an object",
            raw.clone(),
            "type_error",
        ));
        return None;
    };

    let type_path = format!("{path}.type");
    match block.get("type") {
        Some(Value::String(kind)) => match kind.as_str() {
            "heading" => {
                let level = heading_level(path, block, errors);
                let text = required_text(path, block, errors);
                Some(Block::Heading {
                    level: level?,
                    text: text?,
                })
            }
            "paragraph" => required_text(path, block, errors).map(|text| Block::Paragraph { text }),
            "list" => list_items(path, block, errors).map(|items| Block::List { items }),
            other => {
                errors.push(FieldError::new(
                    type_path,
                    format!("Unknown block type: {other}"),
                    Value::String(other.to_string()),
                    "unknown_block_type",
                ));
                None
            }
        },
        Some(other) => {
            errors.push(FieldError::new(
                type_path,
                "Block type must be a string",
                other.clone(),
                "type_error",
            ));
            None
        }
        None => {
            errors.push(FieldError::new(
                type_path,
                "Block type is required",
                Value::Null,
                "missing",
            ));
            None
        }
    }
}

fn heading_level(path: &str, block: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<u8> {
    let raw = block.get("level").cloned().unwrap_or(Value::Null);
    match raw.as_u64() {
        Some(level @ 1..=6) => u8::try_from(level).ok(),
        _ => {
            errors.push(FieldError::new(
                format!("{path}.level"),
                "Heading level must be an integer between 1 and 6",
                raw,
                "heading_level",
            ));
            None
        }
    }
}

fn required_text(path: &str, block: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    match block.get("text") {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
        Some(other) => {
            errors.push(FieldError::new(
                format!("{path}.text"),
                "Text cannot be empty",
                other.clone(),
                "blank",
            ));
            None
        }
        None => {
            errors.push(FieldError::new(
                format!("{path}.text"),
                "Text is required",
                Value::Null,
                "missing",
            ));
            None
        }
    }
}

fn list_items(path: &str, block: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<Vec<String>> {
    let items_path = format!("{path}.items");
    let raw = match block.get("items") {
        Some(Value::Array(raw)) if !raw.is_empty() => raw,
        Some(Value::Array(_)) => {
            errors.push(FieldError::new(
                items_path,
                "List must contain at least one item",
                Value::Array(Vec::new()),
                "empty_list",
            ));
            return None;
        }
        other => {
            errors.push(FieldError::new(
                items_path,
                "List items must be a list of strings",
                other.cloned().unwrap_or(Value::Null),
                "type_error",
            ));
            return None;
        }
    };

    let before = errors.len();
    let items: Vec<String> = raw
        .iter()
        .enumerate()
        .filter_map(|(j, item)| match item {
            Value::String(s) => Some(s.clone()),
            other => {
                errors.push(FieldError::new(
                    format!("{items_path}[{j}]"),
                    "List item must be a string",
                    other.clone(),
                    "type_error",
                ));
                None
            }
        })
        .collect();

    (errors.len() == before).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_preserves_order() {
        let raw = json!({"blocks": [
            {"type": "heading", "level": 1, "text": "Welcome"},
            {"type": "paragraph", "text": "Hi"},
            {"type": "list", "items": ["a", "b"]},
            {"type": "paragraph", "text": "Bye"}
        ]});

        let body = GuideBody::parse(&raw).unwrap();
        assert_eq!(body.blocks.len(), 4);
        assert_eq!(
            body.blocks[0],
            Block::Heading {
                level: 1,
                text: "Welcome".to_string()
            }
        );
        assert_eq!(
            body.blocks[3],
            Block::Paragraph {
                text: "Bye".to_string()
            }
        );
    }

    #[test]
    fn test_empty_blocks_rejected() {
        let errors = GuideBody::parse(&json!({"blocks": []})).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "body.blocks");
        assert_eq!(errors[0].code, "empty_blocks");
    }

    #[test]
    fn test_not_an_object() {
        let errors = GuideBody::parse(&json!("text")).unwrap_err();
        assert_eq!(errors[0].field, "body");
        assert_eq!(errors[0].code, "type_error");
    }

    #[test]
    fn test_heading_level_out_of_range() {
        let errors = GuideBody::parse(&json!({"blocks": [
            {"type": "paragraph", "text": "ok"},
            {"type": "heading", "level": 7, "text": "Too deep"}
        ]}))
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "body.blocks[1].level");
        assert_eq!(errors[0].value, json!(7));
        assert_eq!(errors[0].code, "heading_level");
    }

    #[test]
    fn test_collects_every_error() {
        let errors = GuideBody::parse(&json!({"blocks": [
            {"type": "heading", "level": 0, "text": " "},
            {"type": "list", "items": []},
            {"type": "quote", "text": "?"}
        ]}))
        .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "body.blocks[0].level",
                "body.blocks[0].text",
                "body.blocks[1].items",
                "body.blocks[2].type",
            ]
        );
        assert_eq!(errors[3].code, "unknown_block_type");
    }

    #[test]
    fn test_list_items_must_be_strings() {
        let errors = GuideBody::parse(&json!({"blocks": [
            {"type": "list", "items": ["a", 2]}
        ]}))
        .unwrap_err();
        assert_eq!(errors[0].field, "body.blocks[0].items[1]");
    }

    #[test]
    fn test_extra_keys_accepted() {
        let body = GuideBody::parse(&json!({"version": 2, "blocks": [
            {"type": "heading", "level": 2, "text": "Steps", "id": "h-1"},
            {"type": "list", "items": ["a", "b"], "style": "ordered"}
        ]}))
        .unwrap();
        assert_eq!(
            body.blocks[1],
            Block::List {
                items: vec!["a".to_string(), "b".to_string()]
            }
        );
    }
}
