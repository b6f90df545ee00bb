//! Metrics for the node daemon.

use crate::errors::NodeError;
use anyhow::Result;
use lazy_static::lazy_static;
use prometheus::{
    register_gauge, register_histogram_vec, register_int_counter_vec, Encoder, Gauge,
    HistogramOpts, HistogramVec, IntCounterVec, Opts, TextEncoder,
};
use std::net::SocketAddr;
use tracing::info;
use warp::http::StatusCode;
use warp::Filter;

lazy_static! {
    /// Counter for ledger operations applied, by operation.
    pub static ref OPERATION_COUNTER: IntCounterVec = register_int_counter_vec!(
        Opts::new(
            "ledger_operations_total",
            "Total number of ledger operations applied"
        ),
        &["op"]
    )
    .expect("ledger_operations_total registers once");

    /// Counter for ledger operations rejected, by operation and error kind.
    pub static ref REJECTION_COUNTER: IntCounterVec = register_int_counter_vec!(
        Opts::new(
            "ledger_rejections_total",
            "Total number of ledger operations rejected"
        ),
        &["op", "kind"]
    )
    .expect("ledger_rejections_total registers once");

    /// Gauge for the current total supply.
    pub static ref TOTAL_SUPPLY: Gauge = register_gauge!(
        Opts::new(
            "ledger_total_supply",
            "Current total token supply"
        )
    )
    .expect("ledger_total_supply registers once");

    /// Histogram for operation processing time, including persistence.
    pub static ref OPERATION_TIME: HistogramVec = register_histogram_vec!(
        HistogramOpts::new(
            "ledger_operation_time_seconds",
            "Time to apply and persist a ledger operation"
        )
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["op"]
    )
    .expect("ledger_operation_time_seconds registers once");
}

/// Renders every registered metric in the Prometheus text format.
pub fn gather_metrics() -> Result<String, NodeError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| NodeError::MetricsError(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| NodeError::MetricsError(e.to_string()))
}

/// Starts the metrics server.
pub async fn start_metrics_server(addr: SocketAddr) -> Result<()> {
    let metrics_route = warp::path("metrics").and(warp::get()).map(|| match gather_metrics() {
        Ok(body) => warp::reply::with_status(body, StatusCode::OK),
        Err(e) => warp::reply::with_status(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR),
    });

    let (bound, server) = warp::serve(metrics_route).try_bind_ephemeral(addr)?;
    info!("Metrics server listening on {}", bound);
    tokio::spawn(server);

    Ok(())
}
