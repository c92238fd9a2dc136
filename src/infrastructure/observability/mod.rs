//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    PrometheusMetrics, create_metrics_router, init_metrics, record_hot_state_op,
    record_http_request, record_knowledge_op,
};
