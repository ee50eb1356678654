use super::*;
use crate::testing::{FailingEmbedder, KeywordEmbedder, RecordingModel};
use std::sync::atomic::Ordering;

fn metadata(path: &str, start: usize, end: usize) -> ChunkMetadata {
    ChunkMetadata {
        file_path: path.to_string(),
        chunk_index: 0,
        start_line: start,
        end_line: end,
        language: Some("Python".to_string()),
        extension: Some("py".to_string()),
        file_hash: "hash".to_string(),
    }
}

fn corpus() -> Vec<Document> {
    vec![
        Document::with_metadata(
            "def parse(text):\n    return parse_tokens(text)",
            metadata("parser.py", 1, 2),
        ),
        Document::with_metadata(
            "def render(page):\n    return render_html(page)",
            metadata("view.py", 5, 6),
        ),
        Document::new("def connect():\n    open_network_socket()"),
        Document::new("def query(sql):\n    database.execute(sql)"),
    ]
}

#[tokio::test]
async fn test_build_embeds_in_batches() {
    let embedder = KeywordEmbedder::default();
    let index = DocumentIndex::build(corpus(), &embedder, 3).await.unwrap();

    assert_eq!(index.len(), 4);
    assert!(!index.is_empty());
    assert_eq!(index.embedding_model(), "keyword-test");
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    assert_eq!(index.documents().count(), 4);
}

#[tokio::test]
async fn test_build_empty_collection() {
    let embedder = KeywordEmbedder::default();
    let index = DocumentIndex::build(vec![], &embedder, 8).await.unwrap();

    assert!(index.is_empty());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert!(index.retrieve("parse", &embedder, 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_build_propagates_embedding_failure() {
    let result = DocumentIndex::build(corpus(), &FailingEmbedder, 2).await;
    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("embedding service unavailable"));
}

#[tokio::test]
async fn test_retrieve_ranks_closest_first() {
    let embedder = KeywordEmbedder::default();
    let index = DocumentIndex::build(corpus(), &embedder, 10).await.unwrap();

    let results = index
        .retrieve("How does render work?", &embedder, 2)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].document.text.starts_with("def render"));
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn test_retrieve_caps_at_top_k() {
    let embedder = KeywordEmbedder::default();
    let index = DocumentIndex::build(corpus(), &embedder, 10).await.unwrap();

    assert_eq!(index.retrieve("parse", &embedder, 10).await.unwrap().len(), 4);
    assert!(index.retrieve("parse", &embedder, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_answer_sends_context_to_model() {
    let embedder = KeywordEmbedder::default();
    let llm = RecordingModel::default();
    let index = DocumentIndex::build(corpus(), &embedder, 10).await.unwrap();

    let answer = index
        .answer("Where is parse defined?", &embedder, &llm, "llama3.2", 1)
        .await
        .unwrap();
    assert_eq!(answer, "answer from llama3.2");

    let (model, prompt) = llm.last_prompt().unwrap();
    assert_eq!(model, "llama3.2");
    assert!(prompt.contains("File: parser.py:1-2"));
    assert!(prompt.contains("return parse_tokens(text)"));
    assert!(!prompt.contains("render_html"));
    assert!(prompt.ends_with("Question: Where is parse defined?\nAnswer: "));
}

#[test]
fn test_build_prompt_without_context() {
    let prompt = build_prompt("What is this?", &[]);
    assert!(prompt.contains("(no matching code was found)"));
    assert!(prompt.contains("Question: What is this?"));
}

#[test]
fn test_document_label() {
    assert_eq!(Document::new("x").label(), None);
    let doc = Document::with_metadata("x", metadata("src/a.py", 3, 9));
    assert_eq!(doc.label().as_deref(), Some("src/a.py:3-9"));
}
