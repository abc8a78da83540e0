use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workbench_core::{FieldType, MutationRequest, TemplateEntry};
use workbench_engine::{Backend, BackendSettings, FailureKind, ReqwestBackend};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    engine_logging::initialize_for_tests();
    ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .expect("backend")
}

fn fields_map(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

#[tokio::test]
async fn upload_sends_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(body_string_contains("filename=\"form.pdf\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "file_id": "abc",
            "filename": "form.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let doc = backend
        .upload("form.pdf", b"%PDF-1.7".to_vec())
        .await
        .expect("upload ok");
    assert_eq!(doc.file_id, "abc");
    assert_eq!(doc.filename, "form.pdf");
}

#[tokio::test]
async fn list_fields_decodes_descriptors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/fields/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 2,
            "fields": [
                {"name": "Name", "type": "text", "tooltip": "Your name", "value": ""},
                {"name": "Agree", "type": "checkbox", "tooltip": "", "value": "Off"}
            ]
        })))
        .mount(&server)
        .await;

    let fields = backend_for(&server).list_fields("abc").await.unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].tooltip.as_deref(), Some("Your name"));
    assert_eq!(fields[1].field_type, FieldType::Checkbox);
    assert_eq!(fields[1].tooltip, None);
}

#[tokio::test]
async fn search_encodes_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/abc"))
        .and(query_param("q", "date of birth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 1,
            "results": [{"name": "DOB", "type": "text", "tooltip": "Date of birth"}]
        })))
        .mount(&server)
        .await;

    let results = backend_for(&server)
        .search("abc", "date of birth")
        .await
        .unwrap();
    assert_eq!(results[0].name, "DOB");
}

#[tokio::test]
async fn template_accepts_list_form_with_section() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/template/abc"))
        .and(query_param("section", "Part1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "template": [
                {"name": "A", "value": "1", "description": "first"},
                {"name": "B", "value": 2}
            ]
        })))
        .mount(&server)
        .await;

    let entries = backend_for(&server)
        .template("abc", Some("Part1"))
        .await
        .unwrap();
    assert_eq!(
        entries,
        vec![
            TemplateEntry::new("A", "1").described("first"),
            TemplateEntry::new("B", 2),
        ]
    );
}

#[tokio::test]
async fn template_accepts_keyed_form() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/template/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success":true,"count":2,"template":{
                "Name":{"value":"","type":"text","description":"Your name"},
                "Agree":{"value":"Off","type":"checkbox","description":""}}}"#,
        ))
        .mount(&server)
        .await;

    let entries = backend_for(&server).template("abc", None).await.unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Name", "Agree"]);
    assert_eq!(entries[1].value, json!("Off"));
}

#[tokio::test]
async fn fill_posts_snapshot_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fill/abc"))
        .and(body_json(json!({"fields": {"Signed": "Yes", "Note": "hi"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Filled 2 fields",
            "output_id": "out-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = backend_for(&server)
        .mutate(
            "abc",
            &MutationRequest::Fill {
                fields: fields_map(&[("Signed", "Yes"), ("Note", "hi")]),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.message, "Filled 2 fields");
    assert_eq!(outcome.output_id, "out-1");
}

#[tokio::test]
async fn clear_all_defaults_sends_null_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/remove-defaults/abc"))
        .and(body_json(json!({"fields": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Cleared 12 defaults",
            "output_id": "out-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = backend_for(&server)
        .mutate("abc", &MutationRequest::ClearDefaults { fields: None })
        .await
        .unwrap();
    assert_eq!(outcome.output_id, "out-2");
}

#[tokio::test]
async fn remove_void_posts_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/remove-void/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Removed VOID",
            "output_id": "out-3"
        })))
        .mount(&server)
        .await;

    let outcome = backend_for(&server)
        .mutate("abc", &MutationRequest::RemoveVoid)
        .await
        .unwrap();
    assert_eq!(outcome.message, "Removed VOID");
}

#[tokio::test]
async fn application_error_carries_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/fields/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "File not found"})))
        .mount(&server)
        .await;

    let err = backend_for(&server).list_fields("missing").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Application);
    assert_eq!(err.message, "File not found");
}

#[tokio::test]
async fn server_error_without_json_is_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fill/abc"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .mutate(
            "abc",
            &MutationRequest::Fill {
                fields: Map::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let backend = ReqwestBackend::new(BackendSettings {
        base_url: "http://127.0.0.1:1".to_string(),
        ..BackendSettings::default()
    })
    .unwrap();
    let err = backend.list_fields("abc").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn download_returns_artifact_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/out-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-filled".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let bytes = backend_for(&server).download("out-1").await.unwrap();
    assert_eq!(bytes, b"%PDF-filled");
}

#[tokio::test]
async fn download_rejects_oversized_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/big"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![b'x'; 32], "application/pdf"))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        max_download_bytes: 16,
        ..BackendSettings::default()
    })
    .unwrap();
    let err = backend.download("big").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 16,
            actual: Some(32)
        }
    );
}

#[tokio::test]
async fn download_of_unknown_output_reports_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "File not found"})))
        .mount(&server)
        .await;

    let err = backend_for(&server).download("gone").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Application);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestBackend::new(BackendSettings {
        base_url: "not a url".to_string(),
        ..BackendSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
