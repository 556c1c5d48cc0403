//! API route handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::HeaderMap, Json};
use tracing::info;

use tfreg_core::constants::MAX_EVENT_PAGE_SIZE;
use tfreg_core::traits::{ContractRegistry, RoleManager};
use tfreg_core::types::{Address, NetworkId, ResourceHash, Role};
use tfreg_crypto::{parse_checksummed, resource_hash, to_checksum_address};

use crate::dto::*;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// Header carrying the authenticated caller of a mutation.
pub const CALLER_HEADER: &str = "x-caller-address";

/// Reads the caller identity set by the hosting authentication layer.
fn caller_from_headers(headers: &HeaderMap) -> Result<Address> {
    let value = headers
        .get(CALLER_HEADER)
        .ok_or_else(|| ApiError::bad_request(format!("Missing {} header", CALLER_HEADER)))?;
    let value = value
        .to_str()
        .map_err(|_| ApiError::bad_request(format!("Malformed {} header", CALLER_HEADER)))?;
    Ok(parse_checksummed(value)?)
}

fn parse_hash(hash: &str) -> Result<ResourceHash> {
    Ok(ResourceHash::from_hex(hash)?)
}

/// POST /api/v1/contracts
pub async fn register_contract(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<RegisterContractRequest>,
) -> Result<Json<RegisterContractResponse>> {
    let caller = caller_from_headers(&headers)?;
    let contract_address = parse_checksummed(&req.contract_address)?;

    state
        .registry
        .register_contract(caller, &req.uri, req.network_id, contract_address)
        .await?;

    let response = RegisterContractResponse {
        resource_hash: resource_hash(&req.uri).to_hex_string(),
        network_id: req.network_id,
        contract_address: to_checksum_address(&contract_address),
        registrar: to_checksum_address(&caller),
    };

    info!(
        uri = %req.uri,
        network_id = req.network_id,
        contract_address = %response.contract_address,
        "Registered contract via API"
    );

    Ok(Json(response))
}

/// GET /api/v1/contracts/:network_id?uri=
pub async fn get_contract(
    State(state): State<Arc<AppState>>,
    ApiPath(network_id): ApiPath<NetworkId>,
    ApiQuery(query): ApiQuery<UriQuery>,
) -> Json<ContractResponse> {
    let address = state.registry.get_contract(&query.uri, network_id).await;

    Json(ContractResponse {
        resource_hash: resource_hash(&query.uri).to_hex_string(),
        network_id,
        contract_address: to_checksum_address(&address),
    })
}

/// GET /api/v1/contracts?uri=
pub async fn get_contracts(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UriQuery>,
) -> Json<ContractsResponse> {
    let entries = state.registry.get_contracts(&query.uri).await;

    Json(ContractsResponse {
        resource_hash: resource_hash(&query.uri).to_hex_string(),
        entries: entries.into_iter().map(EntryDto::from).collect(),
    })
}

/// GET /api/v1/hashes/:hash/contracts
pub async fn get_contracts_by_hash(
    State(state): State<Arc<AppState>>,
    ApiPath(hash): ApiPath<String>,
) -> Result<Json<ContractsResponse>> {
    let hash = parse_hash(&hash)?;
    let entries = state.registry.get_contracts_by_hash(hash).await;

    Ok(Json(ContractsResponse {
        resource_hash: hash.to_hex_string(),
        entries: entries.into_iter().map(EntryDto::from).collect(),
    }))
}

/// GET /api/v1/hashes/:hash/contracts/:network_id
pub async fn get_contract_by_hash(
    State(state): State<Arc<AppState>>,
    ApiPath((hash, network_id)): ApiPath<(String, NetworkId)>,
) -> Result<Json<ContractResponse>> {
    let hash = parse_hash(&hash)?;
    let address = state.registry.get_contract_by_hash(hash, network_id).await;

    Ok(Json(ContractResponse {
        resource_hash: hash.to_hex_string(),
        network_id,
        contract_address: to_checksum_address(&address),
    }))
}

/// POST /api/v1/roles/grant
pub async fn grant_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<RoleRequest>,
) -> Result<Json<RoleResponse>> {
    let caller = caller_from_headers(&headers)?;
    let role: Role = req.role.parse()?;
    let account = parse_checksummed(&req.account)?;

    state.registry.grant_role(caller, role, account).await?;
    let has_role = state.registry.has_role(role, account).await;

    Ok(Json(RoleResponse::new(role, &account, has_role)))
}

/// POST /api/v1/roles/revoke
pub async fn revoke_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<RoleRequest>,
) -> Result<Json<RoleResponse>> {
    let caller = caller_from_headers(&headers)?;
    let role: Role = req.role.parse()?;
    let account = parse_checksummed(&req.account)?;

    state.registry.revoke_role(caller, role, account).await?;
    let has_role = state.registry.has_role(role, account).await;

    Ok(Json(RoleResponse::new(role, &account, has_role)))
}

/// GET /api/v1/roles/:role/:account
pub async fn has_role(
    State(state): State<Arc<AppState>>,
    ApiPath((role, account)): ApiPath<(String, String)>,
) -> Result<Json<RoleResponse>> {
    let role: Role = role.parse()?;
    let account = parse_checksummed(&account)?;
    let has_role = state.registry.has_role(role, account).await;

    Ok(Json(RoleResponse::new(role, &account, has_role)))
}

/// GET /api/v1/events?from=&limit=
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<EventsQuery>,
) -> Json<EventsResponse> {
    let from = query.from.unwrap_or(0);
    let limit = query.limit.unwrap_or(MAX_EVENT_PAGE_SIZE);

    let events = state.registry.events(from, limit).await;
    let next = events.last().map(|e| e.sequence + 1).unwrap_or(from);

    Json(EventsResponse {
        events: events.into_iter().map(LoggedEventDto::from).collect(),
        next,
    })
}

/// GET /api/v1/stats
pub async fn get_registry_stats(State(state): State<Arc<AppState>>) -> Json<RegistryStatsResponse> {
    Json(state.registry.stats().await.into())
}

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);
    let uptime = start.elapsed().as_secs();

    let stats = state.registry.stats().await;

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: uptime,
        resource_count: stats.resource_count,
        persistent: state.is_persistent(),
    })
}
