//! # HTTP Sink Tests
//!
//! hs-01 extraction results applied through the hs-04 HTTP adapters to
//! in-process fakes of Elasticsearch and Meilisearch.

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use axum::http::StatusCode;
    use fabric_proto::fixtures::{kv_delete, kv_write};
    use hs_01_block_transformation::transform_block;
    use hs_04_storage_sinks::adapters::meilisearch::ranking_rules;
    use hs_04_storage_sinks::{
        ElasticsearchConfig, ElasticsearchSink, MeilisearchConfig, MeilisearchSink, SinkBackend,
        SinkConfig, SinkError, StorageSink,
    };
    use serde_json::{json, Value};
    use shared_types::ExtractionResult;

    use crate::fixtures::{self, CHAINCODE, TX_DATE_MILLIS};
    use crate::mock_servers::{start_elasticsearch, start_meilisearch, UNREACHABLE_URL};

    const INDEX: &str = "mychannel_assets";

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// One block putting K1 and deleting K2.
    fn put_and_delete() -> ExtractionResult {
        let block = fixtures::block(
            7,
            vec![fixtures::tx(
                "tx-7",
                CHAINCODE,
                vec![kv_write("K1", br#"{"title":"Foobar"}"#), kv_delete("K2")],
            )],
        );
        transform_block(&block).unwrap()
    }

    fn puts(keys: &[&str]) -> ExtractionResult {
        let writes = keys
            .iter()
            .map(|k| kv_write(k, format!(r#"{{"key":"{}"}}"#, k).as_bytes()))
            .collect();
        transform_block(&fixtures::block(1, vec![fixtures::tx("tx-1", CHAINCODE, writes)])).unwrap()
    }

    fn deletes(keys: &[&str]) -> ExtractionResult {
        let writes = keys.iter().map(|k| kv_delete(k)).collect();
        transform_block(&fixtures::block(2, vec![fixtures::tx("tx-2", CHAINCODE, writes)])).unwrap()
    }

    fn ndjson(body: &str) -> Vec<Value> {
        body.lines().map(|l| serde_json::from_str(l).unwrap()).collect()
    }

    // =============================================================================
    // ELASTICSEARCH
    // =============================================================================

    #[tokio::test]
    async fn test_elasticsearch_bulk_request() {
        let (url, state) = start_elasticsearch().await;
        let sink = ElasticsearchSink::new(ElasticsearchConfig::for_testing(vec![url])).unwrap();

        sink.apply(&put_and_delete()).await.unwrap();

        let bodies = state.bulk_bodies.lock().clone();
        assert_eq!(bodies.len(), 1);
        assert_eq!(
            ndjson(&bodies[0]),
            vec![
                json!({"index": {"_index": INDEX, "_id": "K1"}}),
                json!({
                    "title": "Foobar",
                    "_fabric_id": "K1",
                    "_fabric_txid": "tx-7",
                    "_fabric_date": TX_DATE_MILLIS,
                }),
                json!({"delete": {"_index": INDEX, "_id": "K2"}}),
            ]
        );
        assert_eq!(state.auth_headers.lock()[0], None);
    }

    #[tokio::test]
    async fn test_elasticsearch_basic_auth() {
        let (url, state) = start_elasticsearch().await;
        let mut config = ElasticsearchConfig::for_testing(vec![url]);
        config.user = "elastic".to_string();
        config.password = "changeme".to_string();
        let sink = ElasticsearchSink::new(config).unwrap();

        sink.apply(&puts(&["K1"])).await.unwrap();

        assert_eq!(
            state.auth_headers.lock()[0].as_deref(),
            Some("Basic ZWxhc3RpYzpjaGFuZ2VtZQ==")
        );
    }

    #[tokio::test]
    async fn test_elasticsearch_empty_result_sends_nothing() {
        let (url, state) = start_elasticsearch().await;
        let sink = ElasticsearchSink::new(ElasticsearchConfig::for_testing(vec![url])).unwrap();

        sink.apply(&ExtractionResult::new()).await.unwrap();

        assert!(state.bulk_bodies.lock().is_empty());
    }

    #[tokio::test]
    async fn test_elasticsearch_item_error_fails_batch() {
        let (url, state) = start_elasticsearch().await;
        state.respond_with(
            StatusCode::OK,
            json!({
                "took": 2,
                "errors": true,
                "items": [
                    {"index": {"_index": INDEX, "_id": "K1", "status": 201}},
                    {"index": {"_index": INDEX, "_id": "K2", "status": 400,
                        "error": {"type": "mapper_parsing_exception", "reason": "failed to parse"}}}
                ]
            }),
        );
        let sink = ElasticsearchSink::new(ElasticsearchConfig::for_testing(vec![url])).unwrap();

        let err = sink.apply(&puts(&["K1", "K2"])).await.unwrap_err();

        match err {
            SinkError::BulkItem { index, id, reason } => {
                assert_eq!(index, INDEX);
                assert_eq!(id, "K2");
                assert_eq!(reason, "failed to parse");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_elasticsearch_server_error() {
        let (url, state) = start_elasticsearch().await;
        state.respond_with(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"}));
        let sink = ElasticsearchSink::new(ElasticsearchConfig::for_testing(vec![url])).unwrap();

        let err = sink.apply(&puts(&["K1"])).await.unwrap_err();

        assert!(matches!(err, SinkError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_elasticsearch_fails_over_to_next_node() {
        let (url, state) = start_elasticsearch().await;
        let sink = ElasticsearchSink::new(ElasticsearchConfig::for_testing(vec![
            UNREACHABLE_URL.to_string(),
            url,
        ]))
        .unwrap();

        sink.apply(&puts(&["K1"])).await.unwrap();

        assert_eq!(state.bulk_bodies.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_elasticsearch_all_nodes_down() {
        let sink = ElasticsearchSink::new(ElasticsearchConfig::for_testing(vec![
            UNREACHABLE_URL.to_string(),
        ]))
        .unwrap();

        let err = sink.apply(&puts(&["K1"])).await.unwrap_err();

        assert!(matches!(err, SinkError::Unavailable { .. }));
    }

    // =============================================================================
    // MEILISEARCH
    // =============================================================================

    #[tokio::test]
    async fn test_meilisearch_creates_index_on_first_use() {
        let (url, state) = start_meilisearch().await;
        let sink = MeilisearchSink::new(MeilisearchConfig::for_testing(url)).unwrap();

        sink.apply(&puts(&["K1"])).await.unwrap();
        sink.apply(&puts(&["K2"])).await.unwrap();

        assert_eq!(state.create_requests.load(Ordering::SeqCst), 1);
        assert_eq!(
            state.indexes.lock().get(INDEX).map(String::as_str),
            Some("_fabric_id")
        );
        assert_eq!(state.ranking_rules.lock().get(INDEX), Some(&ranking_rules()));
        assert_eq!(
            state.ranking_rules.lock()[INDEX].last().map(String::as_str),
            Some("_fabric_date:desc")
        );
    }

    #[tokio::test]
    async fn test_meilisearch_existing_index_reused() {
        let (url, state) = start_meilisearch().await;
        state
            .indexes
            .lock()
            .insert(INDEX.to_string(), "_fabric_id".to_string());
        let sink = MeilisearchSink::new(MeilisearchConfig::for_testing(url)).unwrap();

        sink.apply(&puts(&["K1"])).await.unwrap();

        assert_eq!(state.create_requests.load(Ordering::SeqCst), 0);
        assert_eq!(state.documents_in(INDEX).len(), 1);
    }

    #[tokio::test]
    async fn test_meilisearch_add_then_delete() {
        let (url, state) = start_meilisearch().await;
        let sink = MeilisearchSink::new(MeilisearchConfig::for_testing(url)).unwrap();

        sink.apply(&puts(&["K1", "K2", "K3"])).await.unwrap();
        assert_eq!(state.documents_in(INDEX).len(), 3);
        assert_eq!(state.documents_in(INDEX)["K2"]["key"], json!("K2"));

        sink.apply(&deletes(&["K1", "K3"])).await.unwrap();

        let remaining = state.documents_in(INDEX);
        assert_eq!(remaining.keys().collect::<Vec<_>>(), vec!["K2"]);
    }

    #[tokio::test]
    async fn test_meilisearch_waits_for_every_task() {
        let (url, state) = start_meilisearch().await;
        let sink = MeilisearchSink::new(MeilisearchConfig::for_testing(url)).unwrap();

        sink.apply(&put_and_delete()).await.unwrap();

        // create + settings + add + delete
        assert_eq!(state.polled_tasks.lock().len(), 4);
    }

    #[tokio::test]
    async fn test_meilisearch_failed_task_fails_batch() {
        let (url, state) = start_meilisearch().await;
        state
            .indexes
            .lock()
            .insert(INDEX.to_string(), "_fabric_id".to_string());
        state.fail_tasks.store(true, Ordering::SeqCst);
        let sink = MeilisearchSink::new(MeilisearchConfig::for_testing(url)).unwrap();

        let err = sink.apply(&puts(&["K1"])).await.unwrap_err();

        match err {
            SinkError::Task { status, reason, .. } => {
                assert_eq!(status, "failed");
                assert_eq!(reason, "simulated failure");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_meilisearch_dotted_channel_gets_valid_uid() {
        let (url, state) = start_meilisearch().await;
        let sink = MeilisearchSink::new(MeilisearchConfig::for_testing(url)).unwrap();
        let envelope = fabric_proto::fixtures::endorser_envelope(
            "org1.channel",
            "tx-1",
            TX_DATE_MILLIS,
            &[(CHAINCODE, vec![kv_write("K1", br#"{"n":1}"#)])],
        );

        sink.apply(&transform_block(&fixtures::block(1, vec![envelope])).unwrap())
            .await
            .unwrap();

        assert!(state.indexes.lock().contains_key("org1_channel_assets"));
        assert_eq!(state.documents_in("org1_channel_assets").len(), 1);
    }

    #[tokio::test]
    async fn test_meilisearch_rejected_key_fails_batch() {
        let (url, state) = start_meilisearch().await;
        let sink = MeilisearchSink::new(MeilisearchConfig::for_testing(url)).unwrap();

        let err = sink.apply(&puts(&["K1", "asset:2"])).await.unwrap_err();

        match err {
            SinkError::Task { status, reason, .. } => {
                assert_eq!(status, "failed");
                assert!(reason.contains("asset:2"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(state.documents_in(INDEX).is_empty());
    }

    #[tokio::test]
    async fn test_meilisearch_api_key_sent_as_bearer() {
        let (url, state) = start_meilisearch().await;
        let mut config = MeilisearchConfig::for_testing(url);
        config.api_key = "masterKey".to_string();
        let sink = MeilisearchSink::new(config).unwrap();

        sink.apply(&puts(&["K1"])).await.unwrap();

        let headers = state.auth_headers.lock().clone();
        assert!(!headers.is_empty());
        assert!(headers
            .iter()
            .all(|h| h.as_deref() == Some("Bearer masterKey")));
    }

    #[tokio::test]
    async fn test_system_namespaces_never_reach_meilisearch() {
        let (url, state) = start_meilisearch().await;
        let sink = MeilisearchSink::new(MeilisearchConfig::for_testing(url)).unwrap();
        let result = transform_block(&fixtures::block(
            0,
            vec![fixtures::tx("tx-0", "_lifecycle", vec![kv_write("namespaces/fields/assets", b"x")])],
        ))
        .unwrap();

        sink.apply(&result).await.unwrap();

        assert_eq!(state.create_requests.load(Ordering::SeqCst), 0);
        assert!(state.documents.lock().is_empty());
    }

    // =============================================================================
    // BACKEND SELECTION
    // =============================================================================

    #[tokio::test]
    async fn test_backend_from_config_routes_to_elasticsearch() {
        let (url, state) = start_elasticsearch().await;
        let backend = SinkBackend::from_config(&SinkConfig::Elasticsearch(
            ElasticsearchConfig::for_testing(vec![url]),
        ))
        .unwrap();

        backend.apply(&puts(&["K1"])).await.unwrap();

        assert_eq!(backend.name(), "elasticsearch");
        assert_eq!(state.bulk_bodies.lock().len(), 1);
    }
}
