//! Object-to-table projections and the request report

use std::fmt;

use crate::error::RenderResult;
use crate::renderer::{Renderer, TableOptions, bounded};

/// Longest Authorization value shown before it is cut.
pub const AUTH_PREVIEW: usize = 50;

type Extractor<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Labeled fields pulled out of a record for display
///
/// ```ignore
/// let projection = Projection::new("Share")
///     .field("name", |s: &Share| s.name.clone())
///     .field("tables", |s: &Share| s.tables.len().to_string());
/// renderer.project(&share, &projection)?;
/// ```
pub struct Projection<T> {
    title: String,
    columns: (String, String),
    fields: Vec<(String, Extractor<T>)>,
}

impl<T> Projection<T> {
    /// Empty projection with `Key`/`Value` headers.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            columns: ("Key".to_string(), "Value".to_string()),
            fields: Vec::new(),
        }
    }

    /// Set the key/value headers used by [`Renderer::project`].
    #[must_use]
    pub fn columns(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns = (key.into(), value.into());
        self
    }

    /// Add a field.
    #[must_use]
    pub fn field<F>(mut self, label: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.fields.push((label.into(), Box::new(extract)));
        self
    }

    /// Table title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Field labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(label, _)| label.as_str())
    }

    /// `(label, value)` pairs for one record.
    #[must_use]
    pub fn extract(&self, record: &T) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(label, f)| (label.clone(), f(record)))
            .collect()
    }

    fn row(&self, record: &T) -> Vec<String> {
        self.fields.iter().map(|(_, f)| f(record)).collect()
    }
}

impl<T> fmt::Debug for Projection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("title", &self.title)
            .field("columns", &self.columns)
            .field("fields", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}

/// An HTTP request described for debugging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    /// HTTP method.
    pub method: String,
    /// Base endpoint URL.
    pub endpoint: String,
    /// Resource path appended to the endpoint.
    pub path: String,
    /// Request headers in order.
    pub headers: Vec<(String, String)>,
    /// Query parameters in order.
    pub params: Vec<(String, String)>,
    /// Body fields in order.
    pub data: Vec<(String, String)>,
    /// Client certificate path.
    pub cert: Option<String>,
    /// Client key path.
    pub key: Option<String>,
}

impl RequestInfo {
    /// Request with a method, endpoint and path.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        endpoint: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            endpoint: endpoint.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Add a body field.
    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.data.push((key.into(), value.to_string()));
        self
    }

    /// Set the client certificate and key.
    #[must_use]
    pub fn client_cert(mut self, cert: impl Into<String>, key: impl Into<String>) -> Self {
        self.cert = Some(cert.into());
        self.key = Some(key.into());
        self
    }

    /// A curl command line that repeats this request.
    #[must_use]
    pub fn curl_command(&self) -> String {
        let mut cmd = format!("curl -X {} {}{}", self.method, self.endpoint, self.path);
        if !self.headers.is_empty() {
            let headers: Vec<String> = self
                .headers
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect();
            cmd.push_str(&format!(" -H \"{}\"", headers.join(",")));
        }
        if let Some(cert) = &self.cert {
            cmd.push_str(&format!(" --cert {cert}"));
        }
        if let Some(key) = &self.key {
            cmd.push_str(&format!(" --key {key}"));
        }
        cmd
    }
}

/// Authorization values are cut to a short preview.
fn shown_header(key: &str, value: &str) -> String {
    if key.eq_ignore_ascii_case("authorization") {
        let preview: String = value.chars().take(AUTH_PREVIEW).collect();
        format!("{preview}...")
    } else {
        value.to_string()
    }
}

impl Renderer {
    /// Print one record as a key/value table, one row per field
    pub fn project<T>(&self, record: &T, projection: &Projection<T>) -> RenderResult<()> {
        let mut grid = self.styled_table(&projection.title)?;
        grid.add_column(self.info_column(&projection.columns.0)?);
        grid.add_column(self.info_column(&projection.columns.1)?);
        for (label, value) in projection.extract(record) {
            grid.add_row([label, value])?;
        }
        self.print_padded(&grid.finish())
    }

    /// Print records as rows, one column per field
    ///
    /// Only the first `max_rows` records are shown.
    pub fn project_rows<T>(&self, records: &[T], projection: &Projection<T>) -> RenderResult<()> {
        let mut grid = self.styled_table(&projection.title)?;
        for label in projection.labels() {
            grid.add_column(self.info_column(label)?);
        }
        for record in bounded(records, self.max_rows(), "projection") {
            grid.add_row(projection.row(record))?;
        }
        self.print_padded(&grid.finish())
    }

    /// Print a request with its headers, parameters, body and curl command
    pub fn request_info(&self, request: &RequestInfo) -> RenderResult<()> {
        let mut grid = self.key_value_table(&TableOptions::new(), "Request Info")?;

        grid.add_row(["method", request.method.as_str()])?;
        grid.add_row(["endpoint", request.endpoint.as_str()])?;
        grid.add_row(["resource path", request.path.as_str()])?;
        grid.end_section();

        grid.add_row(["Headers", ""])?;
        for (key, value) in &request.headers {
            grid.add_row([key.clone(), shown_header(key, value)])?;
        }

        for (heading, pairs) in [("Parameter", &request.params), ("Data", &request.data)] {
            if pairs.is_empty() {
                continue;
            }
            grid.end_section();
            grid.add_row([heading, ""])?;
            for (key, value) in pairs {
                grid.add_row([key.as_str(), value.as_str()])?;
            }
        }

        grid.end_section();
        grid.add_row(["CURL".to_string(), request.curl_command()])?;
        self.print_padded(&grid.finish())
    }
}
