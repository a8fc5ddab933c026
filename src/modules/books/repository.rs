//! One SQL statement per operation against the shared pool.

use bookshelf_db::Database;
use sqlx::SqlitePool;

use super::models::{Book, BookFields};

// NULL genre/category (rows written outside the service) read back as ""
const LIST_SQL: &str = r#"SELECT id, title, author,
    COALESCE(genre, '') AS genre, COALESCE(category, '') AS category
    FROM books ORDER BY id"#;

const GET_SQL: &str = r#"SELECT id, title, author,
    COALESCE(genre, '') AS genre, COALESCE(category, '') AS category
    FROM books WHERE id = ?"#;

#[derive(Clone, Debug)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(LIST_SQL)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(GET_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Insert a row and return it with the id SQLite assigned.
    pub async fn create(&self, fields: BookFields) -> Result<Book, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO books (title, author, genre, category) VALUES (?, ?, ?, ?)",
        )
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.genre)
        .bind(&fields.category)
        .execute(&self.pool)
        .await?;

        Ok(fields.with_id(result.last_insert_rowid()))
    }

    /// Overwrite all four columns. Returns the number of rows touched, which is
    /// zero when `id` does not exist.
    pub async fn update(&self, id: i64, fields: &BookFields) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE books SET title = ?, author = ?, genre = ?, category = ? WHERE id = ?",
        )
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.genre)
        .bind(&fields.category)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Returns the number of rows removed; zero when `id` does not exist.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::SCHEMA;

    async fn repository() -> (tempfile::TempDir, Database, BookRepository) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(&dir.path().join("books.db"), 1)
            .await
            .unwrap();
        db.execute_script(SCHEMA).await.unwrap();
        let repo = BookRepository::new(&db);
        (dir, db, repo)
    }

    fn fields(title: &str) -> BookFields {
        BookFields {
            title: title.to_string(),
            author: "Herbert".to_string(),
            genre: "SciFi".to_string(),
            category: "Fiction".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_in_order() {
        let (_dir, _db, repo) = repository().await;

        let first = repo.create(fields("Dune")).await.unwrap();
        let second = repo.create(fields("Dune Messiah")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.list().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let (_dir, _db, repo) = repository().await;

        let first = repo.create(fields("Dune")).await.unwrap();
        assert_eq!(repo.delete(first.id).await.unwrap(), 1);
        let second = repo.create(fields("Dune")).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn null_optional_columns_read_as_empty() {
        let (_dir, db, repo) = repository().await;

        sqlx::query("INSERT INTO books (title, author) VALUES ('Dune', 'Herbert')")
            .execute(db.pool())
            .await
            .unwrap();

        let book = repo.get(1).await.unwrap().unwrap();
        assert_eq!(book.genre, "");
        assert_eq!(book.category, "");
    }

    #[tokio::test]
    async fn update_and_delete_report_rows_touched() {
        let (_dir, _db, repo) = repository().await;
        let book = repo.create(fields("Dune")).await.unwrap();

        assert_eq!(repo.update(book.id, &fields("Dune")).await.unwrap(), 1);
        assert_eq!(repo.update(404, &fields("Dune")).await.unwrap(), 0);
        assert_eq!(repo.delete(404).await.unwrap(), 0);
        assert_eq!(repo.get(404).await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_table_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(&dir.path().join("empty.db"), 1)
            .await
            .unwrap();
        let repo = BookRepository::new(&db);

        let err = repo.list().await.unwrap_err();
        assert!(err.to_string().contains("no such table"));
    }
}
