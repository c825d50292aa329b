//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_http_request, record_llm_request, record_rag_node,
    record_rag_run, PrometheusMetrics,
};
