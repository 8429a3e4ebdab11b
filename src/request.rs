use serde_json::{Map, Value};

/// HTTP method an operation is fixed to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    Get,
    Post,
}

/// One logical request to the API: method, path, query parameters, and,
/// for POST, a JSON body.
///
/// Built by the operation methods on [`EnrichClient`](crate::EnrichClient)
/// and handed to the executor as-is. Optional parameters that were not set
/// never appear in the query string or body.
#[derive(Clone, Debug)]
pub struct RequestSpec {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Map<String, Value>,
}

impl RequestSpec {
    /// Starts a GET request for the given path.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: Map::new(),
        }
    }

    /// Starts a POST request for the given path.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Map::new(),
        }
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    /// Appends a query parameter when set; `None` is omitted entirely rather
    /// than sent as an empty value.
    pub fn query_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Sets a JSON body field.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_owned(), value.into());
        self
    }

    /// Sets a JSON body field when set; `None` is omitted.
    pub fn field_opt(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    /// Method this spec was built with.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Path relative to the client's base URL.
    pub fn path(&self) -> &str {
        &self.path
    }
}
