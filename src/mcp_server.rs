use crate::session::DocSession;
use crate::types::*;

use anyhow::{Context, Result};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    handler::server::{router::prompt::PromptRouter, tool::ToolRouter, wrapper::Parameters},
    model::*,
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct DocMcpServer {
    session: Arc<DocSession>,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

impl DocMcpServer {
    /// Create a new server with a session built from the layered configuration
    pub fn new() -> Result<Self> {
        let session = DocSession::new()?;
        Self::with_session(Arc::new(session))
    }

    /// Create a new server around an existing session
    pub fn with_session(session: Arc<DocSession>) -> Result<Self> {
        Ok(Self {
            session,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        })
    }

    /// Get the underlying session
    pub fn session(&self) -> &DocSession {
        &self.session
    }
}

fn to_json<T: serde::Serialize>(response: &T) -> Result<String, String> {
    serde_json::to_string_pretty(response).map_err(|e| format!("Serialization failed: {}", e))
}

#[tool_router(router = tool_router)]
impl DocMcpServer {
    #[tool(
        description = "Load source code from uploaded files, a local folder, or a git repository URL, split it into chunks and build the question-answering index. Replaces any previously loaded source."
    )]
    async fn load_source(
        &self,
        Parameters(req): Parameters<LoadSourceRequest>,
    ) -> Result<String, String> {
        req.validate()?;

        let response = self
            .session
            .load_source(req)
            .await
            .map_err(|e| format!("{:#}", e))?; // Use alternate display to show full error chain

        to_json(&response)
    }

    #[tool(description = "Ask a question about the loaded source code")]
    async fn query_documentation(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<String, String> {
        req.validate()?;

        let response = self
            .session
            .query_documentation(&req.query)
            .await
            .map_err(|e| format!("{:#}", e))?;

        to_json(&response)
    }

    #[tool(
        description = "Generate documentation for the loaded project covering its main components, functions and architecture"
    )]
    async fn generate_documentation(
        &self,
        Parameters(_req): Parameters<GenerateDocumentationRequest>,
    ) -> Result<String, String> {
        let response = self
            .session
            .generate_documentation()
            .await
            .map_err(|e| format!("{:#}", e))?;

        to_json(&response)
    }

    #[tool(description = "List the models available on the local inference service")]
    async fn list_models(
        &self,
        Parameters(_req): Parameters<ListModelsRequest>,
    ) -> Result<String, String> {
        let response = ModelsResponse {
            models: self.session.available_models().await,
        };

        to_json(&response)
    }

    #[tool(
        description = "Compute cyclomatic complexity, lines of code and per-function metrics for a source file"
    )]
    async fn analyze_complexity(
        &self,
        Parameters(req): Parameters<AnalyzeRequest>,
    ) -> Result<String, String> {
        req.validate()?;

        let metrics = self
            .session
            .analyze_complexity(req.path)
            .await
            .map_err(|e| e.to_string())?;

        to_json(&metrics)
    }

    #[tool(description = "Show how a file or a piece of code would be split into chunks")]
    async fn preview_chunks(
        &self,
        Parameters(req): Parameters<ChunkPreviewRequest>,
    ) -> Result<String, String> {
        req.validate()?;

        let response = self
            .session
            .preview_chunks(req)
            .await
            .map_err(|e| format!("{:#}", e))?;

        to_json(&response)
    }
}

// Prompts for slash commands
#[prompt_router]
impl DocMcpServer {
    #[prompt(
        name = "ask",
        description = "Ask a question about the loaded source code"
    )]
    async fn ask_prompt(
        &self,
        Parameters(args): Parameters<serde_json::Value>,
    ) -> Result<Vec<PromptMessage>, McpError> {
        let question = args.get("question").and_then(|v| v.as_str()).unwrap_or("");

        Ok(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!("Please answer this question about the loaded code: {}", question),
        )])
    }

    #[prompt(
        name = "document",
        description = "Load a source (folder or git URL) and generate its documentation"
    )]
    async fn document_prompt(
        &self,
        Parameters(args): Parameters<serde_json::Value>,
    ) -> Result<GetPromptResult, McpError> {
        let source = args.get("source").and_then(|v| v.as_str()).unwrap_or(".");

        let messages = vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "Please load the source at '{}' and then generate comprehensive documentation for it.",
                source
            ),
        )];

        Ok(GetPromptResult {
            description: Some(format!("Document the code at {}", source)),
            messages,
        })
    }

    #[prompt(
        name = "models",
        description = "List the models available for answering questions"
    )]
    async fn models_prompt(&self) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            "Please list the models available on the local inference service.",
        )]
    }
}

#[tool_handler(router = self.tool_router)]
#[prompt_handler]
impl ServerHandler for DocMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "codedoc".into(),
                title: Some("CodeDoc RAG - Question answering over source code".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Retrieval-augmented documentation for source code. \
                Use load_source to load files, a folder or a git repository, \
                then query_documentation to ask questions or generate_documentation \
                for a project overview. list_models shows the available models."
                    .into(),
            ),
        }
    }
}

impl DocMcpServer {
    pub async fn serve_stdio() -> Result<()> {
        tracing::info!("Starting CodeDoc MCP server");

        let server = Self::new().context("Failed to create MCP server")?;

        let transport = rmcp::transport::io::stdio();

        server.serve(transport).await?.waiting().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
