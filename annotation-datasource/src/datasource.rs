use chrono::DateTime;
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Client, Url,
};
use std::time::Duration;
use tracing::{debug, error, info, Instrument, Span};

use crate::error::QueryError;
use crate::frame::Frame;
use crate::models::{
    AnnotationRecord, CheckHealthResult, ConnectionOptions, DataQuery, HealthStatus,
    PluginContext, QueryDataRequest, QueryDataResponse, QueryModel, QueryResult, API_KEY,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_LIMIT: u32 = 200;

#[derive(Debug, Clone)]
pub struct DatasourceOptions {
    pub timeout: Duration,
    pub connect_timeout: Option<Duration>,
    pub limit: u32,
    /// Span every query and health check is recorded under.
    pub span: Span,
}

impl Default for DatasourceOptions {
    fn default() -> Self {
        DatasourceOptions {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            limit: DEFAULT_LIMIT,
            span: Span::none(),
        }
    }
}

/// Fetches annotations from the remote API and turns them into frames.
///
/// Holds only immutable configuration and a pooled HTTP client; connection
/// settings and the credential are read from the plugin context on every call.
pub struct AnnotationDatasource {
    client: Client,
    limit: u32,
    span: Span,
}

impl AnnotationDatasource {
    pub fn new(options: DatasourceOptions) -> anyhow::Result<Self> {
        let mut builder = Client::builder().timeout(options.timeout);
        if let Some(connect) = options.connect_timeout {
            builder = builder.connect_timeout(connect);
        }
        let client = builder.build()?;
        options.span.in_scope(|| {
            debug!(
                "HTTP client created with timeout: {:?}, limit: {}",
                options.timeout, options.limit
            )
        });
        Ok(AnnotationDatasource {
            client,
            limit: options.limit,
            span: options.span,
        })
    }

    /// Teardown hook. Nothing outlives the client, which is dropped here.
    pub fn dispose(self) {
        self.span.in_scope(|| info!("Disposing annotation datasource"));
    }

    /// Runs every query of the batch, one after another. A failing query
    /// never affects its siblings.
    pub async fn query_data(&self, req: QueryDataRequest) -> QueryDataResponse {
        async {
            info!(queries = req.queries.len(), "QueryData called");
            let mut response = QueryDataResponse::default();
            for q in &req.queries {
                let res = match self.query(&req.plugin_context, q).await {
                    Ok(frame) => {
                        debug!(ref_id = %q.ref_id, rows = frame.len(), "Query succeeded");
                        Ok(frame)
                    }
                    Err(e) => {
                        error!(ref_id = %q.ref_id, kind = ?e.kind(), "Query failed: {}", e);
                        Err(e)
                    }
                };
                response.results.insert(q.ref_id.clone(), QueryResult::from(res));
            }
            response
        }
        .instrument(self.span.clone())
        .await
    }

    async fn query(&self, ctx: &PluginContext, q: &DataQuery) -> Result<Frame, QueryError> {
        let qm: QueryModel =
            serde_json::from_slice(&q.json).map_err(|e| QueryError::parse("query", e))?;

        let settings = &ctx.data_source_instance_settings;
        let options: ConnectionOptions = serde_json::from_slice(&settings.json_data)
            .map_err(|e| QueryError::parse("datasource options", e))?;
        let api_key = settings
            .decrypted_secure_json_data
            .get(API_KEY)
            .map(String::as_str)
            .unwrap_or_default();

        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| QueryError::parse("api key", e))?;

        let url = self.annotations_url(&options.server_url, &qm.tags, q)?;
        debug!("Request URL is: {}", url);

        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, bearer)
            .send()
            .await?;
        // Body is read in full here, which releases the connection.
        let body = resp.bytes().await?;
        debug!(bytes = body.len(), "Received annotation response");

        let annotations: Vec<AnnotationRecord> = serde_json::from_slice(&body)
            .map_err(|e| QueryError::parse("annotation response", e))?;
        debug!("Parsed {} annotation(s)", annotations.len());

        project(&annotations)
    }

    fn annotations_url(&self, server_url: &str, tags: &str, q: &DataQuery) -> Result<Url, QueryError> {
        let from_ms = q.time_range.from.timestamp() * 1000;
        let to_ms = q.time_range.to.timestamp() * 1000;
        let raw = format!(
            "{}/api/annotations?tags={}&limit={}&type=annotation&from={}&to={}",
            server_url, tags, self.limit, from_ms, to_ms
        );
        Url::parse(&raw).map_err(|e| QueryError::parse("server URL", e))
    }

    /// Always reports OK; the remote API is not probed.
    pub async fn check_health(&self) -> CheckHealthResult {
        self.span.in_scope(|| info!("CheckHealth called"));
        CheckHealthResult {
            status: HealthStatus::Ok,
            message: "Data source is working".to_string(),
        }
    }
}

/// One row per record, in response order: the record time truncated to whole
/// seconds, and a constant 1.0.
fn project(annotations: &[AnnotationRecord]) -> Result<Frame, QueryError> {
    let mut frame = Frame::annotations();
    for anno in annotations {
        let ts = DateTime::from_timestamp(anno.time / 1000, 0)
            .ok_or_else(|| QueryError::parse("annotation time", format!("{} out of range", anno.time)))?;
        frame.append_row(ts, 1.0);
    }
    Ok(frame)
}
