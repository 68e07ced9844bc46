//! REST surface for a running node
//!
//! Peers deliver finished blocks to `/inform/block`, clients queue transfers
//! through `/transactions/new`, and the read endpoints expose the chain, the
//! balance map and per-account history.

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::block::{Block, NodeId};
use crate::chain::Blockchain;
use crate::error::ChainError;

/// Shared handle the handlers work against.
#[derive(Clone)]
pub struct ApiContext {
    pub chain: Arc<RwLock<Blockchain>>,
}

impl ApiContext {
    pub fn new(chain: Arc<RwLock<Blockchain>>) -> Self {
        Self { chain }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    ChainRejected(ChainError),
    InvalidInput(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ChainRejected(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        ApiError::ChainRejected(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct NewTransactionRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

#[derive(Serialize)]
struct SuccessResponse {
    message: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware. Logs method, path, status and duration.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the router with all endpoints (shared with the test harness).
pub fn build_api_router(ctx: Arc<ApiContext>) -> Router {
    Router::new()
        .route("/transactions/new", post(new_transaction))
        .route("/inform/block", post(inform_block))
        .route("/chain", get(get_chain))
        .route("/state", get(get_state))
        .route("/history/:account", get(get_history))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(ctx)
}

/// Serve the API on the node's own port; node identifiers double as loopback
/// ports.
pub async fn run_api_server(
    ctx: Arc<ApiContext>,
    port: NodeId,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_api_router(ctx);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn new_transaction(
    State(ctx): State<Arc<ApiContext>>,
    Json(req): Json<NewTransactionRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    if req.sender.is_empty() || req.recipient.is_empty() {
        return Err(ApiError::InvalidInput(
            "sender and recipient must be non-empty".to_string(),
        ));
    }

    let mut chain = ctx.chain.write().await;
    chain.new_transaction(req.sender, req.recipient, req.amount);

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            message: format!(
                "Transaction will be considered for block {}",
                chain.next_number()
            ),
        }),
    ))
}

async fn inform_block(
    State(ctx): State<Arc<ApiContext>>,
    Json(block): Json<Block>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let number = block.number();

    let mut chain = ctx.chain.write().await;
    chain.accept_block(block)?;

    Ok(Json(SuccessResponse {
        message: format!("Block {} accepted", number),
    }))
}

async fn get_chain(State(ctx): State<Arc<ApiContext>>) -> impl IntoResponse {
    let chain = ctx.chain.read().await;
    Json(serde_json::json!({
        "length": chain.height(),
        "chain": chain.chain(),
    }))
}

async fn get_state(State(ctx): State<Arc<ApiContext>>) -> impl IntoResponse {
    let chain = ctx.chain.read().await;
    Json(chain.ledger().balances().clone())
}

async fn get_history(
    State(ctx): State<Arc<ApiContext>>,
    Path(account): Path<String>,
) -> impl IntoResponse {
    let chain = ctx.chain.read().await;
    Json(serde_json::json!({
        "account": account,
        "history": chain.history(&account),
    }))
}

async fn health_check(State(ctx): State<Arc<ApiContext>>) -> impl IntoResponse {
    let chain = ctx.chain.read().await;
    Json(serde_json::json!({
        "status": "healthy",
        "node_id": chain.node_id(),
        "height": chain.height(),
        "mempool_size": chain.pending().len(),
        "next_miner": chain.expected_miner(chain.next_number()),
    }))
}
