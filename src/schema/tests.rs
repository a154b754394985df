//! Entity schema tests

use super::*;
use crate::error::Error;

fn posts_schema() -> EntitySchema {
    EntitySchema::new("posts")
        .field("id", FieldType::Integer)
        .field("title", FieldType::Text)
        .field("likeCount", FieldType::Integer)
        .field("createdAt", FieldType::Timestamp)
}

#[test]
fn test_field_lookup() {
    let schema = posts_schema();

    assert!(schema.has_field("title"));
    assert!(!schema.has_field("author"));
    assert_eq!(schema.field_type("likeCount").unwrap(), FieldType::Integer);
    assert!(matches!(
        schema.field_type("author"),
        Err(Error::UnknownField { field }) if field == "author"
    ));

    let names: Vec<_> = schema.field_names().collect();
    assert_eq!(names, vec!["id", "title", "likeCount", "createdAt"]);
}

#[test]
fn test_validate_ok() {
    assert!(posts_schema().validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_identifiers() {
    let schema = EntitySchema::new("posts; DROP TABLE posts").field("id", FieldType::Integer);
    assert!(schema.validate().is_err());

    let schema = EntitySchema::new("posts").field("like count", FieldType::Integer);
    assert!(schema.validate().is_err());
}

#[test]
fn test_validate_rejects_duplicates_and_empty() {
    let schema = EntitySchema::new("posts")
        .field("id", FieldType::Integer)
        .field("id", FieldType::Text);
    assert!(schema.validate().is_err());

    assert!(EntitySchema::new("posts").validate().is_err());
}

#[test]
fn test_from_yaml() {
    let yaml = r"
name: posts
fields:
  - name: id
    type: integer
  - name: title
    type: text
  - name: createdAt
    type: timestamp
";
    let schema = EntitySchema::from_yaml(yaml).unwrap();
    assert_eq!(schema.name, "posts");
    assert_eq!(schema.fields.len(), 3);
    assert_eq!(schema.field_type("createdAt").unwrap(), FieldType::Timestamp);
}

#[test]
fn test_identifier_check() {
    assert!(is_valid_identifier("likeCount"));
    assert!(is_valid_identifier("_id"));
    assert!(!is_valid_identifier("1abc"));
    assert!(!is_valid_identifier(""));
    assert!(!is_valid_identifier("a-b"));
}
