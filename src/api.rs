//! Backend endpoint addresses and request descriptions
//!
//! Nothing here performs I/O. Requests are described as a method, a path
//! relative to the API base, query parameters and an optional body; the host
//! sends them.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Resolved backend endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse the API base URL (a trailing slash is added if missing)
    pub fn new(base: &str) -> Result<Self> {
        let mut base = base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).with_context(|| format!("Invalid API base URL: {}", base))?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn register(&self) -> Result<Url> {
        self.resolve("auth/register")
    }

    pub fn login(&self) -> Result<Url> {
        self.resolve("auth/login")
    }

    pub fn refresh(&self) -> Result<Url> {
        self.resolve("auth/refresh-token")
    }

    /// Join a relative path onto the base
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid API path: {}", path))
    }
}

/// HTTP method of a described request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Request body, if any
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    Json(Value),
    /// Raw text sent as is
    Text(String),
    /// Multipart form with a single file part
    File { field: String, path: PathBuf },
}

/// A request to send to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<ApiBody>,
}

impl ApiRequest {
    /// A GET request
    pub fn new(path: &str) -> Self {
        Self::with_method(Method::Get, path)
    }

    pub fn post(path: &str) -> Self {
        Self::with_method(Method::Post, path)
    }

    pub fn patch(path: &str) -> Self {
        Self::with_method(Method::Patch, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::with_method(Method::Delete, path)
    }

    fn with_method(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Attach a JSON body
    pub fn json<T: Serialize>(mut self, body: &T) -> serde_json::Result<Self> {
        self.body = Some(ApiBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    pub fn text(mut self, body: &str) -> Self {
        self.body = Some(ApiBody::Text(body.to_string()));
        self
    }

    /// Attach a file as a multipart form part
    pub fn file(mut self, field: &str, path: &Path) -> Self {
        self.body = Some(ApiBody::File {
            field: field.to_string(),
            path: path.to_path_buf(),
        });
        self
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a parameter only when a value is present
    pub fn param_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full URL with the query string encoded
    pub fn url(&self, endpoints: &Endpoints) -> Result<Url> {
        let mut url = endpoints.resolve(&self.path)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}
