//! Sample descriptors and rows shaped like the books and movies catalogues.

use serde_json::{json, Value};
use std::time::Duration;

use cadence_core::{
    DataSourceDescriptor, DataSourceId, ParameterSpec, ParameterType, QueryDefinition, Row,
};

/// Convert a JSON object literal into a row
///
/// # Panics
/// If `value` is not an object.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(row) => row,
        other => panic!("row() expects a JSON object, got {}", other),
    }
}

/// Descriptor for a books catalogue
pub fn books_descriptor() -> DataSourceDescriptor {
    DataSourceDescriptor::new("books-api", "Books API")
        .with_parameter(
            ParameterSpec::new("author", ParameterType::String)
                .with_description("Author name")
                .required(),
        )
        .with_parameter(
            ParameterSpec::new("genre", ParameterType::String)
                .with_description("Book genre")
                .required(),
        )
        .with_parameter(
            ParameterSpec::new("year", ParameterType::Number).with_description("Publication year"),
        )
        .with_attributes([
            "title",
            "author",
            "genre",
            "price",
            "availability",
            "rating",
            "publishDate",
        ])
}

/// Descriptor for a movies catalogue
pub fn movies_descriptor() -> DataSourceDescriptor {
    DataSourceDescriptor::new("movies-api", "Movies API")
        .with_parameter(ParameterSpec::new("title", ParameterType::String))
        .with_parameter(ParameterSpec::new("director", ParameterType::String))
        .with_parameter(ParameterSpec::new("genre", ParameterType::String).required())
        .with_parameter(ParameterSpec::new("year", ParameterType::Number))
        .with_attributes(["title", "director", "genre", "releaseDate", "rating", "duration"])
}

/// A single book row
pub fn book_row() -> Row {
    row(json!({
        "title": "Test Book",
        "author": "Test Author",
        "genre": "Test Genre",
        "price": 29.99,
        "availability": true,
        "rating": 4.5,
        "publishDate": "2025-01-01"
    }))
}

/// A single movie row
pub fn movie_row() -> Row {
    row(json!({
        "title": "Test Movie",
        "director": "Test Director",
        "genre": "Test Genre",
        "releaseDate": "2025",
        "rating": 4.5,
        "duration": "2h 30min"
    }))
}

/// An active query with a fixed id
pub fn query(id: &str, data_source_id: &str, interval_ms: u64) -> QueryDefinition {
    QueryDefinition::new(
        format!("Query {}", id),
        DataSourceId::new(data_source_id),
        Duration::from_millis(interval_ms),
    )
    .with_id(id)
}
