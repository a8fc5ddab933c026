use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// A row from the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Assigned by SQLite on insert
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub category: String,
}

/// Request body for create and update.
///
/// Every field is optional on the wire; absent or `null` fields are stored as
/// empty strings. A body `id` must be an integer but is never written; the
/// path id names the row. Other unknown fields are ignored. Only a JSON
/// object is accepted: serde would otherwise bind a positional array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct BookPayload {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub category: Option<String>,
}

#[derive(Deserialize)]
struct PayloadObject {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl TryFrom<Map<String, Value>> for BookPayload {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields: PayloadObject = serde_json::from_value(Value::Object(object))?;
        Ok(Self {
            id: fields.id,
            title: fields.title,
            author: fields.author,
            genre: fields.genre,
            category: fields.category,
        })
    }
}

/// Column values written by insert and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub category: String,
}

impl From<BookPayload> for BookFields {
    fn from(p: BookPayload) -> Self {
        Self {
            title: p.title.unwrap_or_default(),
            author: p.author.unwrap_or_default(),
            genre: p.genre.unwrap_or_default(),
            category: p.category.unwrap_or_default(),
        }
    }
}

impl BookFields {
    pub fn with_id(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            category: self.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_fields_become_empty() {
        let payload: BookPayload =
            serde_json::from_str(r#"{"title":"Dune","genre":null}"#).unwrap();
        let fields = BookFields::from(payload);
        assert_eq!(fields.title, "Dune");
        assert_eq!(fields.author, "");
        assert_eq!(fields.genre, "");
        assert_eq!(fields.category, "");
    }

    #[test]
    fn body_id_is_ignored() {
        let payload: BookPayload =
            serde_json::from_str(r#"{"id":99,"title":"Dune","author":"Herbert"}"#).unwrap();
        let book = BookFields::from(payload).with_id(3);
        assert_eq!(book.id, 3);
        assert_eq!(book.author, "Herbert");
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        assert!(serde_json::from_str::<BookPayload>(r#"{"title":5}"#).is_err());
        assert!(serde_json::from_str::<BookPayload>(r#"{"id":"oops","title":"a"}"#).is_err());
        assert!(serde_json::from_str::<BookPayload>(r#"{"id":1.5}"#).is_err());
        assert!(serde_json::from_str::<BookPayload>(r#"["Dune"]"#).is_err());
    }

    #[test]
    fn book_serializes_with_all_fields() {
        let book = Book {
            id: 1,
            title: "Dune".into(),
            author: "Herbert".into(),
            genre: "SciFi".into(),
            category: "Fiction".into(),
        };
        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            serde_json::json!({
                "id": 1,
                "title": "Dune",
                "author": "Herbert",
                "genre": "SciFi",
                "category": "Fiction"
            })
        );
    }
}
