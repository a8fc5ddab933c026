use axum::{extract::State, http::StatusCode, Json};

use bookshelf_http::{AppError, JsonBody, PathId};

use super::models::{Book, BookFields, BookPayload};
use super::repository::BookRepository;

pub const NOT_FOUND_MESSAGE: &str = "not found";

/// GET /books
pub async fn list_books(State(repo): State<BookRepository>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(repo.list().await?))
}

/// GET /books/{id}
pub async fn get_book(
    State(repo): State<BookRepository>,
    PathId(id): PathId,
) -> Result<Json<Book>, AppError> {
    let book = match id {
        Some(id) => repo.get(id).await?,
        None => None,
    };
    book.map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))
}

/// POST /books
pub async fn create_book(
    State(repo): State<BookRepository>,
    JsonBody(payload): JsonBody<BookPayload>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = repo.create(BookFields::from(payload)).await?;
    tracing::debug!(book_id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /books/{id}
///
/// Echoes the submitted fields under the path id. A missing id is not an
/// error: the statement touches zero rows and the response is still 200.
/// An id that cannot name a row skips storage and echoes the body's own id
/// (0 when absent).
pub async fn update_book(
    State(repo): State<BookRepository>,
    PathId(id): PathId,
    JsonBody(payload): JsonBody<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let body_id = payload.id.unwrap_or_default();
    let fields = BookFields::from(payload);
    let Some(id) = id else {
        return Ok(Json(fields.with_id(body_id)));
    };
    let rows = repo.update(id, &fields).await?;
    tracing::debug!(book_id = id, rows, "book updated");
    Ok(Json(fields.with_id(id)))
}

/// DELETE /books/{id}
///
/// 204 whether or not the row existed.
pub async fn delete_book(
    State(repo): State<BookRepository>,
    PathId(id): PathId,
) -> Result<StatusCode, AppError> {
    if let Some(id) = id {
        let rows = repo.delete(id).await?;
        tracing::debug!(book_id = id, rows, "book deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}
