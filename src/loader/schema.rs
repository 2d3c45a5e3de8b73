//! Schema Loading
//!
//! Loader chain for the schema pointer: URL, GraphQL SDL file, JSON
//! introspection file. The first loader that accepts the pointer wins.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use super::introspection::{introspection_operation, parse_introspection, to_sdl};

pub const GRAPHQL_EXTENSIONS: &[&str] = &["graphql", "graphqls", "gql"];

/// Where a schema comes from, as decided by the loader chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// Endpoint answering the introspection query
    Endpoint(String),
    /// Remote SDL document fetched with GET
    RemoteSdl(String),
    /// Remote introspection JSON fetched with GET
    RemoteJson(String),
    GraphQlFile(PathBuf),
    JsonFile(PathBuf),
}

impl SchemaSource {
    pub fn detect(pointer: &str) -> Result<Self> {
        if pointer.starts_with("http://") || pointer.starts_with("https://") {
            // Query strings and fragments do not take part in the extension check
            let path = pointer
                .split(['?', '#'])
                .next()
                .unwrap_or(pointer);
            return Ok(match extension(Path::new(path)).as_deref() {
                Some(ext) if GRAPHQL_EXTENSIONS.contains(&ext) => Self::RemoteSdl(pointer.into()),
                Some("json") => Self::RemoteJson(pointer.into()),
                _ => Self::Endpoint(pointer.into()),
            });
        }

        let path = PathBuf::from(pointer);
        match extension(&path).as_deref() {
            Some(ext) if GRAPHQL_EXTENSIONS.contains(&ext) => Ok(Self::GraphQlFile(path)),
            Some("json") => Ok(Self::JsonFile(path)),
            _ => bail!(
                "Unable to load schema from '{}': expected a URL, a GraphQL file ({}) or a JSON introspection file",
                pointer,
                GRAPHQL_EXTENSIONS
                    .iter()
                    .map(|ext| format!(".{ext}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    /// Local file backing this source, if any
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::GraphQlFile(path) | Self::JsonFile(path) => Some(path),
            _ => None,
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Loads and validates the schema the operations are checked against
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    client: reqwest::Client,
    headers: HeaderMap,
}

impl SchemaLoader {
    /// `headers` are sent with every remote request
    pub fn new(headers: &[(String, String)]) -> Result<Self> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name '{}'", name))?;
            let header_value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header '{}'", name))?;
            map.append(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("validate-operations/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            headers: map,
        })
    }

    pub async fn load(&self, pointer: &str) -> Result<Valid<Schema>> {
        let sdl = self.load_sdl(pointer).await?;
        build_schema(&sdl, pointer)
    }

    /// Fetch the schema as SDL text, converting introspection results
    pub async fn load_sdl(&self, pointer: &str) -> Result<String> {
        let source = SchemaSource::detect(pointer)?;
        log::debug!("Loading schema from {:?}", source);

        match source {
            SchemaSource::Endpoint(url) => {
                let response = self
                    .client
                    .post(&url)
                    .headers(self.headers.clone())
                    .json(&introspection_operation())
                    .send()
                    .await
                    .with_context(|| format!("Failed to reach GraphQL endpoint {}", url))?
                    .error_for_status()
                    .with_context(|| format!("Introspection request to {} failed", url))?;
                let value: Value = response
                    .json()
                    .await
                    .with_context(|| format!("Invalid JSON from {}", url))?;
                introspection_to_sdl(value)
            }
            SchemaSource::RemoteSdl(url) => self.fetch_text(&url).await,
            SchemaSource::RemoteJson(url) => {
                let text = self.fetch_text(&url).await?;
                let value: Value = serde_json::from_str(&text)
                    .with_context(|| format!("Invalid JSON from {}", url))?;
                introspection_to_sdl(value)
            }
            SchemaSource::GraphQlFile(path) => tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read schema file {}", path.display())),
            SchemaSource::JsonFile(path) => {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read schema file {}", path.display()))?;
                let value: Value = serde_json::from_str(&text)
                    .with_context(|| format!("Invalid JSON in {}", path.display()))?;
                introspection_to_sdl(value)
            }
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Request to {} failed", url))?
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }
}

fn introspection_to_sdl(value: Value) -> Result<String> {
    Ok(to_sdl(parse_introspection(value)?))
}

/// Parse and validate SDL. Schema errors are load failures.
pub fn build_schema(sdl: &str, location: &str) -> Result<Valid<Schema>> {
    Schema::parse_and_validate(sdl, location).map_err(|invalid| {
        anyhow::anyhow!(
            "Schema from {} is invalid:\n{}",
            location,
            invalid.errors
        )
    })
}
