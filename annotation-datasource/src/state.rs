use crate::config::Config;
use crate::datasource::{AnnotationDatasource, DatasourceOptions, DEFAULT_LIMIT, DEFAULT_TIMEOUT};
use std::time::Duration;
use tracing::{debug, info_span};

// Default to 5 MB if not specified
const DEFAULT_MAX_BODY_BYTES: usize = 5_242_880;

pub struct AppState {
    pub datasource: AnnotationDatasource,
    pub max_request_body_bytes: usize,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let options = DatasourceOptions {
            timeout,
            connect_timeout: cfg.connect_timeout_secs.map(Duration::from_secs),
            limit: cfg.limit.unwrap_or(DEFAULT_LIMIT),
            span: info_span!("annotation_datasource"),
        };
        if options.limit == 0 {
            anyhow::bail!("limit must be greater than zero");
        }
        let datasource = AnnotationDatasource::new(options)?;

        let max_request_body_bytes = cfg.max_request_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES);
        debug!("Maximum request body size: {} bytes", max_request_body_bytes);

        Ok(AppState {
            datasource,
            max_request_body_bytes,
        })
    }
}
