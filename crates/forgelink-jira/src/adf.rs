//! Atlassian Document Format (ADF) helpers.
//!
//! JIRA Cloud represents rich text as a tree of typed nodes. Only two
//! conversions are needed here: flattening a document to plain text, and
//! wrapping plain text as a single-paragraph document.

use serde_json::{json, Value};

/// Extract plain text from an ADF document.
///
/// Walks the node tree depth-first, left-to-right, collecting the `text`
/// of every node whose type is `"text"`, and joins the collected parts
/// with a single space. Non-text leaves (hard breaks, mentions, emoji)
/// contribute nothing. Malformed nodes are skipped, never an error.
pub fn extract_text(content: &Value) -> String {
    let mut parts = Vec::new();
    collect_text(content, &mut parts);
    parts.join(" ")
}

fn collect_text(node: &Value, parts: &mut Vec<String>) {
    match node {
        Value::Object(obj) => {
            if obj.get("type").and_then(Value::as_str) == Some("text") {
                let text = obj.get("text").and_then(Value::as_str).unwrap_or("");
                parts.push(text.to_string());
            }
            if let Some(children) = obj.get("content").and_then(Value::as_array) {
                for child in children {
                    collect_text(child, parts);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text(item, parts);
            }
        }
        _ => {}
    }
}

/// Wrap plain text as a single-paragraph ADF document.
///
/// This is the shape JIRA requires for issue descriptions, comment
/// bodies, and document-typed custom fields.
pub fn paragraph_doc(text: &str) -> Value {
    json!({
        "type": "doc",
        "version": 1,
        "content": [
            {
                "type": "paragraph",
                "content": [{ "type": "text", "text": text }],
            }
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_paragraph() {
        let doc = json!({
            "type": "doc",
            "version": 1,
            "content": [
                {
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": "hello world" }],
                }
            ],
        });
        assert_eq!(extract_text(&doc), "hello world");
    }

    #[test]
    fn test_extract_skips_non_text_nodes() {
        let content = json!([
            { "type": "text", "text": "a" },
            { "type": "emoji" },
            { "type": "text", "text": "b" },
        ]);
        assert_eq!(extract_text(&content), "a b");
    }

    #[test]
    fn test_extract_nested_containers() {
        let doc = json!({
            "type": "doc",
            "content": [
                {
                    "type": "bulletList",
                    "content": [
                        {
                            "type": "listItem",
                            "content": [
                                {
                                    "type": "paragraph",
                                    "content": [
                                        { "type": "text", "text": "first" },
                                        { "type": "hardBreak" },
                                        { "type": "text", "text": "second" },
                                    ],
                                }
                            ],
                        }
                    ],
                }
            ],
        });
        assert_eq!(extract_text(&doc), "first second");
    }

    #[test]
    fn test_extract_text_node_without_text_field() {
        let content = json!([
            { "type": "text" },
            { "type": "text", "text": "ok" },
        ]);
        // Missing text contributes an empty part, not an error.
        assert_eq!(extract_text(&content), " ok");
    }

    #[test]
    fn test_extract_non_document_values() {
        assert_eq!(extract_text(&json!(null)), "");
        assert_eq!(extract_text(&json!(42)), "");
        assert_eq!(extract_text(&json!({ "type": "paragraph" })), "");
    }

    #[test]
    fn test_paragraph_doc_shape() {
        let doc = paragraph_doc("release notes");
        assert_eq!(doc["type"], "doc");
        assert_eq!(doc["version"], 1);
        assert_eq!(doc["content"][0]["type"], "paragraph");
        assert_eq!(doc["content"][0]["content"][0]["text"], "release notes");
    }

    #[test]
    fn test_paragraph_doc_round_trips_through_extract() {
        assert_eq!(extract_text(&paragraph_doc("hello world")), "hello world");
    }
}
