use crate::{InMemoryDataSourceRegistry, InMemoryQueryRepository, InMemoryResultStore, StaticDataSource};
use cadence_core::{
    CoreError, DataSource, DataSourceDescriptor, DataSourceId, DataSourceRegistry, ParameterMap,
    QueryDefinition, QueryId, QueryRepository, ResultEnvelope, ResultStore,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn success(query_id: &str, marker: u64) -> ResultEnvelope {
    let row = json!({ "n": marker }).as_object().cloned().unwrap();
    ResultEnvelope::success(QueryId::new(query_id), vec![row])
}

fn marker(envelope: &ResultEnvelope) -> u64 {
    envelope.data[0]["n"].as_u64().unwrap()
}

#[test]
fn test_latest_result_is_absent_before_any_store() {
    let store = InMemoryResultStore::new();
    let id = QueryId::new("q1");

    assert!(store.latest_result(&id).is_none());
    assert!(store.query_results(&id).is_empty());
    assert_eq!(store.result_count(&id), 0);
}

#[test]
fn test_stored_error_is_distinct_from_absent() {
    let store = InMemoryResultStore::new();
    let id = QueryId::new("q1");

    store.store_result(ResultEnvelope::failure(id.clone(), "API not found"));

    let latest = store.latest_result(&id).expect("error envelope should be stored");
    assert!(latest.is_error());
    assert_eq!(latest.error.as_deref(), Some("API not found"));
}

#[test]
fn test_history_is_newest_first() {
    let store = InMemoryResultStore::new();
    let id = QueryId::new("q1");

    for n in 0..3 {
        store.store_result(success("q1", n));
    }

    let markers: Vec<_> = store.query_results(&id).iter().map(marker).collect();
    assert_eq!(markers, vec![2, 1, 0]);
    assert_eq!(marker(&store.latest_result(&id).unwrap()), 2);
}

#[test]
fn test_history_is_bounded_by_capacity() {
    let store = InMemoryResultStore::new();
    let id = QueryId::new("q1");

    for n in 0..150 {
        store.store_result(success("q1", n));
    }

    let history = store.query_results(&id);
    assert_eq!(history.len(), 100);
    assert_eq!(marker(&history[0]), 149);
    assert_eq!(marker(&history[99]), 50);
}

#[test]
fn test_custom_capacity() {
    let store = InMemoryResultStore::with_capacity(3);
    for n in 0..5 {
        store.store_result(success("q1", n));
    }
    assert_eq!(store.result_count(&QueryId::new("q1")), 3);

    // Zero is clamped so the latest result is always kept.
    let store = InMemoryResultStore::with_capacity(0);
    store.store_result(success("q1", 1));
    assert_eq!(store.capacity(), 1);
    assert_eq!(store.result_count(&QueryId::new("q1")), 1);
}

#[test]
fn test_clear_query_results_only_touches_one_query() {
    let store = InMemoryResultStore::new();
    store.store_result(success("q1", 1));
    store.store_result(success("q2", 2));

    store.clear_query_results(&QueryId::new("q1"));

    assert!(store.latest_result(&QueryId::new("q1")).is_none());
    assert!(store.latest_result(&QueryId::new("q2")).is_some());
}

#[test]
fn test_clear_all_results() {
    let store = InMemoryResultStore::new();
    store.store_result(success("q1", 1));
    store.store_result(success("q2", 2));

    store.clear_all_results();

    assert!(store.latest_result(&QueryId::new("q1")).is_none());
    assert!(store.latest_result(&QueryId::new("q2")).is_none());
    assert!(store.all_results().is_empty());
}

#[test]
fn test_all_results_snapshot() {
    let store = InMemoryResultStore::new();
    store.store_result(success("q1", 1));
    store.store_result(success("q1", 2));
    store.store_result(success("q2", 3));

    let all = store.all_results();
    assert_eq!(all.len(), 2);
    assert_eq!(all[&QueryId::new("q1")].len(), 2);
    assert_eq!(marker(&all[&QueryId::new("q2")][0]), 3);
}

#[tokio::test]
async fn test_subscriber_sees_each_new_latest_result() {
    let store = InMemoryResultStore::new();
    let id = QueryId::new("q1");
    let mut latest = store.subscribe(&id);
    assert!(latest.borrow().is_none());

    store.store_result(success("q1", 1));
    latest.changed().await.unwrap();
    assert_eq!(marker(latest.borrow_and_update().as_ref().unwrap()), 1);

    store.store_result(success("q2", 9));
    store.store_result(success("q1", 2));
    latest.changed().await.unwrap();
    assert_eq!(marker(latest.borrow_and_update().as_ref().unwrap()), 2);
}

#[tokio::test]
async fn test_late_subscriber_starts_at_current_result() {
    let store = InMemoryResultStore::new();
    store.store_result(success("q1", 5));

    let latest = store.subscribe(&QueryId::new("q1"));
    assert_eq!(marker(latest.borrow().as_ref().unwrap()), 5);
}

#[tokio::test]
async fn test_clearing_notifies_subscribers() {
    let store = InMemoryResultStore::new();
    let id = QueryId::new("q1");
    store.store_result(success("q1", 1));
    let mut latest = store.subscribe(&id);

    store.clear_query_results(&id);
    latest.changed().await.unwrap();
    assert!(latest.borrow_and_update().is_none());

    store.store_result(success("q1", 2));
    store.clear_all_results();
    latest.changed().await.unwrap();
    assert!(latest.borrow().is_none());
    assert!(store.all_results().is_empty());

    // The subscription survives clears.
    store.store_result(success("q1", 3));
    latest.changed().await.unwrap();
    assert_eq!(marker(latest.borrow().as_ref().unwrap()), 3);
}

#[test]
fn test_subscribing_does_not_create_results() {
    let store = InMemoryResultStore::new();
    let id = QueryId::new("q1");
    let latest = store.subscribe(&id);

    assert!(store.all_results().is_empty());
    assert_eq!(store.result_count(&id), 0);

    drop(latest);
    store.clear_all_results();
    assert!(store.latest_result(&id).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_keep_capacity_invariant() {
    let store = Arc::new(InMemoryResultStore::with_capacity(50));
    let mut tasks = Vec::new();

    for writer in 0..8u64 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            for n in 0..100u64 {
                let query_id = if n % 2 == 0 { "shared" } else { "other" };
                store.store_result(success(query_id, writer * 1000 + n));
                let _ = store.latest_result(&QueryId::new("shared"));
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(store.result_count(&QueryId::new("shared")), 50);
    assert_eq!(store.result_count(&QueryId::new("other")), 50);
}

#[tokio::test]
async fn test_registry_lookup() -> Result<(), CoreError> {
    let registry = InMemoryDataSourceRegistry::with_descriptors([
        DataSourceDescriptor::new("books-api", "Books API"),
        DataSourceDescriptor::new("movies-api", "Movies API"),
    ])?;

    let found = registry.find_by_id(&DataSourceId::new("books-api")).await?;
    assert_eq!(found.map(|d| d.name), Some("Books API".to_string()));
    assert!(registry.find_by_id(&DataSourceId::new("missing")).await?.is_none());

    let ids: Vec<_> = registry.list().await?.into_iter().map(|d| d.id.0).collect();
    assert_eq!(ids, vec!["books-api", "movies-api"]);
    Ok(())
}

#[tokio::test]
async fn test_registry_rejects_duplicate_ids() {
    let registry = InMemoryDataSourceRegistry::new();
    registry
        .register(DataSourceDescriptor::new("books-api", "Books API"))
        .unwrap();

    let err = registry
        .register(DataSourceDescriptor::new("books-api", "Other"))
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));

    assert!(registry.unregister(&DataSourceId::new("books-api")));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_query_repository_crud() -> Result<(), CoreError> {
    let repo = InMemoryQueryRepository::new();
    let query = QueryDefinition::new("Books", DataSourceId::new("books-api"), Duration::from_secs(300))
        .with_id("1");
    let mut inactive = QueryDefinition::new("Movies", DataSourceId::new("movies-api"), Duration::from_secs(600))
        .with_id("2");
    inactive.is_active = false;

    repo.save(&query).await?;
    repo.save(&inactive).await?;

    assert_eq!(repo.find_by_id(&QueryId::new("1")).await?, Some(query.clone()));
    assert_eq!(repo.find_all().await?.len(), 2);
    assert_eq!(repo.find_active().await?, vec![query]);

    repo.delete(&QueryId::new("1")).await?;
    assert!(repo.find_by_id(&QueryId::new("1")).await?.is_none());

    let err = repo.delete(&QueryId::new("1")).await.unwrap_err();
    assert_eq!(err, CoreError::QueryNotFound("1".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_query_repository_rejects_invalid_query() {
    let repo = InMemoryQueryRepository::new();
    let query = QueryDefinition::new("Books", DataSourceId::new("books-api"), Duration::ZERO);

    assert!(repo.save(&query).await.is_err());
    assert!(repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_static_source_filters_by_attribute_parameters() -> Result<(), CoreError> {
    let source = StaticDataSource::from_values([
        json!({ "title": "Dune", "author": "Frank Herbert", "year": 1965 }),
        json!({ "title": "Emma", "author": "Jane Austen", "year": 1815 }),
    ])?;

    let mut parameters = ParameterMap::new();
    parameters.insert("author".to_string(), json!("jane austen"));
    parameters.insert("unrelated".to_string(), json!(true));
    let rows = source.query_rows(&parameters).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], json!("Emma"));

    let mut parameters = ParameterMap::new();
    parameters.insert("year".to_string(), json!(1965));
    let rows = source.query_rows(&parameters).await?;
    assert_eq!(rows[0]["title"], json!("Dune"));

    assert_eq!(source.query_rows(&ParameterMap::new()).await?.len(), 2);
    Ok(())
}

#[test]
fn test_static_source_rejects_non_objects() {
    assert!(StaticDataSource::from_values([json!([1, 2])]).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_static_source_latency() {
    let source = StaticDataSource::new(Vec::new()).with_latency(Duration::from_millis(300));
    let start = tokio::time::Instant::now();

    source.query_rows(&ParameterMap::new()).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(300));
}
