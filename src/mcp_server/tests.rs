use super::*;
use crate::config::{Config, OllamaConfig};
use crate::indexer::ChunkConfig;
use crate::ollama::{ERROR_FETCHING_MODELS, OllamaClient};
use crate::session::NOT_LOADED;
use crate::testing::{KeywordEmbedder, RecordingModel};
use tempfile::TempDir;

fn test_server() -> DocMcpServer {
    let mut config = Config::default();
    config.chunking = ChunkConfig::new(200, 40, 10).unwrap();

    let models = OllamaClient::new(&OllamaConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        ..OllamaConfig::default()
    })
    .unwrap();

    let session = DocSession::with_collaborators(
        config,
        Arc::new(models),
        Arc::new(KeywordEmbedder::default()),
        Arc::new(RecordingModel::default()),
    )
    .unwrap();

    DocMcpServer::with_session(Arc::new(session)).unwrap()
}

fn project_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("main.py"),
        "def main():\n    config = parse_config('app.toml')\n    render(config)\n\n\ndef render(config):\n    print('rendering', config)\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_get_info() {
    let info = test_server().get_info();

    assert_eq!(info.server_info.name, "codedoc");
    assert!(info.server_info.title.is_some());
    assert!(info.instructions.is_some());
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.prompts.is_some());
}

#[test]
fn test_routers_register_tools_and_prompts() {
    let server = test_server();

    let mut tools: Vec<String> = server
        .tool_router
        .list_all()
        .into_iter()
        .map(|t| t.name.to_string())
        .collect();
    tools.sort();
    assert_eq!(
        tools,
        vec![
            "analyze_complexity",
            "generate_documentation",
            "list_models",
            "load_source",
            "preview_chunks",
            "query_documentation",
        ]
    );

    let mut prompts: Vec<String> = server
        .prompt_router
        .list_all()
        .into_iter()
        .map(|p| p.name.to_string())
        .collect();
    prompts.sort();
    assert_eq!(prompts, vec!["ask", "document", "models"]);
}

#[tokio::test]
async fn test_query_before_load() {
    let server = test_server();
    let result = server
        .query_documentation(Parameters(QueryRequest {
            query: "What does main do?".to_string(),
        }))
        .await
        .unwrap();

    let response: QueryResponse = serde_json::from_str(&result).unwrap();
    assert_eq!(response.answer, NOT_LOADED);
    assert!(!response.loaded);
}

#[tokio::test]
async fn test_query_rejects_empty_question() {
    let server = test_server();
    let result = server
        .query_documentation(Parameters(QueryRequest {
            query: "  ".to_string(),
        }))
        .await;
    assert_eq!(result.unwrap_err(), "Query cannot be empty");
}

#[tokio::test]
async fn test_load_then_query() {
    let server = test_server();
    let dir = project_dir();

    let result = server
        .load_source(Parameters(LoadSourceRequest {
            source: Some(dir.path().to_string_lossy().to_string()),
            files: vec![],
            model: None,
            extensions: vec![],
        }))
        .await
        .unwrap();

    let response: LoadResponse = serde_json::from_str(&result).unwrap();
    assert_eq!(response.files_indexed, 1);
    assert!(response.chunks_indexed >= 1);

    let result = server
        .generate_documentation(Parameters(GenerateDocumentationRequest {}))
        .await
        .unwrap();
    let response: QueryResponse = serde_json::from_str(&result).unwrap();
    assert!(response.loaded);
    assert_eq!(response.answer, "answer from llama3.2");
}

#[tokio::test]
async fn test_load_source_reports_full_error_chain() {
    let server = test_server();
    let result = server
        .load_source(Parameters(LoadSourceRequest {
            source: Some("/nonexistent/source/dir".to_string()),
            files: vec![],
            model: None,
            extensions: vec![],
        }))
        .await;

    assert!(result.unwrap_err().contains("/nonexistent/source/dir"));
}

#[tokio::test]
async fn test_load_source_validates_request() {
    let server = test_server();
    let result = server
        .load_source(Parameters(LoadSourceRequest {
            source: None,
            files: vec![],
            model: None,
            extensions: vec![],
        }))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_models_offline() {
    let server = test_server();
    let result = server
        .list_models(Parameters(ListModelsRequest {}))
        .await
        .unwrap();

    let response: ModelsResponse = serde_json::from_str(&result).unwrap();
    assert_eq!(response.models, vec![ERROR_FETCHING_MODELS]);
}

#[tokio::test]
async fn test_analyze_complexity_tool() {
    let server = test_server();
    let dir = project_dir();

    let result = server
        .analyze_complexity(Parameters(AnalyzeRequest {
            path: dir.path().join("main.py").to_string_lossy().to_string(),
        }))
        .await
        .unwrap();
    let metrics: crate::indexer::CodeMetrics = serde_json::from_str(&result).unwrap();
    assert_eq!(metrics.function_count, 2);

    let err = server
        .analyze_complexity(Parameters(AnalyzeRequest {
            path: dir.path().join("nope.py").to_string_lossy().to_string(),
        }))
        .await
        .unwrap_err();
    assert!(err.starts_with("Error analyzing"));
}

#[tokio::test]
async fn test_preview_chunks_tool() {
    let server = test_server();
    let content = "def first():\n    return 'a fairly long line of text here'\n\ndef second():\n    return 'another fairly long line of text'\n".to_string();

    let result = server
        .preview_chunks(Parameters(ChunkPreviewRequest {
            path: None,
            content: Some(content),
            extension: Some("py".to_string()),
            size_only: false,
        }))
        .await
        .unwrap();

    let response: ChunkPreviewResponse = serde_json::from_str(&result).unwrap();
    assert_eq!(response.chunk_count, response.chunks.len());
    assert_eq!(response.chunk_count, 2);
    assert!(response.chunks[1].starts_with("def second"));
}

#[tokio::test]
async fn test_preview_chunks_requires_input() {
    let server = test_server();
    let result = server
        .preview_chunks(Parameters(ChunkPreviewRequest {
            path: None,
            content: None,
            extension: None,
            size_only: false,
        }))
        .await;
    assert!(result.is_err());
}

// ===== Prompt Handler Tests =====

#[tokio::test]
async fn test_prompt_ask() {
    let server = test_server();
    let args = serde_json::json!({ "question": "How is config parsed?" });

    let messages = server.ask_prompt(Parameters(args)).await.unwrap();
    assert_eq!(messages.len(), 1);
    let debug_str = format!("{:?}", messages[0].content);
    assert!(debug_str.contains("How is config parsed?"));
}

#[tokio::test]
async fn test_prompt_document_with_source() {
    let server = test_server();
    let args = serde_json::json!({ "source": "https://github.com/user/repo" });

    let result = server.document_prompt(Parameters(args)).await.unwrap();
    assert!(result.description.is_some());
    let debug_str = format!("{:?}", result.messages[0].content);
    assert!(debug_str.contains("https://github.com/user/repo"));
}

#[tokio::test]
async fn test_prompt_document_default_source() {
    let server = test_server();
    let result = server
        .document_prompt(Parameters(serde_json::json!({})))
        .await
        .unwrap();
    let debug_str = format!("{:?}", result.messages[0].content);
    assert!(debug_str.contains("'.'"));
}

#[tokio::test]
async fn test_prompt_models() {
    let server = test_server();
    let messages = server.models_prompt().await;
    assert_eq!(messages.len(), 1);
}
