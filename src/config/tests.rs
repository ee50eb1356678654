use super::*;
use crate::indexer::BoundaryMode;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.chunking.max_chunk_size, 512);
    assert_eq!(config.chunking.min_chunk_size, 128);
    assert_eq!(config.chunking.overlap, 50);
    assert_eq!(config.chunking.max_chunks_per_file, 10);
    assert!(!config.chunking.apply_overlap);
    assert_eq!(config.ollama.base_url, "http://localhost:11434");
    assert_eq!(config.ollama.llm_model, "llama3.2");
    assert_eq!(config.ollama.embedding_model, "snowflake-arctic-embed");
    assert_eq!(config.indexing.batch_size, 32);
    assert_eq!(config.retrieval.top_k, 5);
}

#[test]
fn test_default_extensions() {
    let config = Config::default();
    assert_eq!(
        config.indexing.file_extensions,
        vec![".py", ".js", ".java", ".cpp", ".h", ".tsx", ".jsx", ".ts"]
    );
}

#[test]
fn test_validate_valid_config() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_min_not_below_max() {
    let mut config = Config::default();
    config.chunking.min_chunk_size = 512;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("chunking.min_chunk_size"));
}

#[test]
fn test_validate_rejects_zero_values() {
    let mut config = Config::default();
    config.chunking.max_chunks_per_file = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.indexing.batch_size = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.retrieval.top_k = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.indexing.max_file_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_base_url() {
    let mut config = Config::default();
    config.ollama.base_url = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_extension_without_dot() {
    let mut config = Config::default();
    config.indexing.file_extensions = vec![".py".to_string(), "rs".to_string()];
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("'rs'"));
}

#[test]
fn test_save_and_load() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    let mut config = Config::default();
    config.chunking.max_chunk_size = 1024;
    config.chunking.boundaries = BoundaryMode::Generic;
    config.ollama.llm_model = "codellama".to_string();
    config.retrieval.top_k = 8;

    config.save(path).unwrap();
    let loaded = Config::from_file(path).unwrap();

    assert_eq!(loaded.chunking.max_chunk_size, 1024);
    assert_eq!(loaded.chunking.boundaries, BoundaryMode::Generic);
    assert_eq!(loaded.ollama.llm_model, "codellama");
    assert_eq!(loaded.retrieval.top_k, 8);
}

#[test]
fn test_load_nonexistent_file() {
    let result = Config::from_file(Path::new("/nonexistent/config.toml"));
    assert!(matches!(
        result.unwrap_err(),
        RagError::Config(ConfigError::FileNotFound(_))
    ));
}

#[test]
fn test_from_file_invalid_toml() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "[chunking\nmax_chunk_size = ").unwrap();

    let result = Config::from_file(temp_file.path());
    assert!(matches!(
        result.unwrap_err(),
        RagError::Config(ConfigError::ParseFailed(_))
    ));
}

#[test]
fn test_from_file_empty_file_uses_defaults() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "").unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.chunking.max_chunk_size, 512);
    assert_eq!(config.retrieval.top_k, 5);
}

#[test]
fn test_from_file_partial_config() {
    let temp_file = NamedTempFile::new().unwrap();
    let partial_config = r#"
[chunking]
max_chunk_size = 2048
boundaries = "none"

[ollama]
llm_model = "mistral"
"#;
    std::fs::write(temp_file.path(), partial_config).unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.chunking.max_chunk_size, 2048);
    assert_eq!(config.chunking.min_chunk_size, 128);
    assert_eq!(config.chunking.boundaries, BoundaryMode::None);
    assert_eq!(config.ollama.llm_model, "mistral");
    assert_eq!(config.ollama.embedding_model, "snowflake-arctic-embed");
}

#[test]
fn test_from_file_runs_validation() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(
        temp_file.path(),
        "[chunking]\nmax_chunk_size = 100\nmin_chunk_size = 200\n",
    )
    .unwrap();

    let result = Config::from_file(temp_file.path());
    assert!(matches!(
        result.unwrap_err(),
        RagError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_toml_serialization() {
    let toml_str = toml::to_string(&Config::default()).unwrap();
    assert!(toml_str.contains("[chunking]"));
    assert!(toml_str.contains("max_chunk_size"));
    assert!(toml_str.contains("llm_model"));
    assert!(toml_str.contains("top_k"));
}

#[test]
fn test_apply_env_overrides() {
    // Safety: these variables are only touched by this test
    unsafe {
        std::env::set_var("CODEDOC_OLLAMA_URL", "http://gpu-box:11434");
        std::env::set_var("CODEDOC_LLM_MODEL", "qwen2.5-coder");
        std::env::set_var("CODEDOC_MAX_CHUNK_SIZE", "800");
        std::env::set_var("CODEDOC_MIN_CHUNK_SIZE", "not_a_number");
        std::env::set_var("CODEDOC_TOP_K", "3");
    }

    let mut config = Config::default();
    config.apply_env_overrides();

    assert_eq!(config.ollama.base_url, "http://gpu-box:11434");
    assert_eq!(config.ollama.llm_model, "qwen2.5-coder");
    assert_eq!(config.chunking.max_chunk_size, 800);
    assert_eq!(config.chunking.min_chunk_size, 128);
    assert_eq!(config.retrieval.top_k, 3);

    // Safety: cleaning up the variables set above
    unsafe {
        std::env::remove_var("CODEDOC_OLLAMA_URL");
        std::env::remove_var("CODEDOC_LLM_MODEL");
        std::env::remove_var("CODEDOC_MAX_CHUNK_SIZE");
        std::env::remove_var("CODEDOC_MIN_CHUNK_SIZE");
        std::env::remove_var("CODEDOC_TOP_K");
    }
}
