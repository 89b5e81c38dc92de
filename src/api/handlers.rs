use crate::models::{
    AdjudicatedMatch, ComparisonStats, FieldPair, MatchResult, ParsedFields, RawRecord,
    RowAlignment,
};
use crate::service::{AdjudicationCache, Adjudicator, FieldMatcher, RowAligner, StatsCalculator};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 共享状态: 同步匹配栈 + 异步裁决层
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<FieldMatcher>,
    pub aligner: Arc<RowAligner>,
    pub stats: Arc<StatsCalculator>,
    pub adjudicator: Arc<Adjudicator>,
    pub cache: Arc<AdjudicationCache>,
}

/// 请求体: 单文档原始抽取记录
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub records: Vec<RawRecord>,
}

/// 请求体: 一对字段值
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub val1: String,
    pub val2: String,
}

/// 请求体: 同名表的两组行
#[derive(Debug, Deserialize)]
pub struct AlignRequest {
    pub table1: Vec<crate::models::TableRow>,
    pub table2: Vec<crate::models::TableRow>,
}

/// 请求体: 两份文档的原始记录
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    pub records1: Vec<RawRecord>,
    pub records2: Vec<RawRecord>,
}

/// 请求体: 批量字段对
#[derive(Debug, Deserialize)]
pub struct BatchCompareRequest {
    pub pairs: Vec<FieldPair>,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub success: bool,
    pub fields: ParsedFields,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub success: bool,
    pub result: MatchResult,
}

#[derive(Debug, Serialize)]
pub struct AlignResponse {
    pub success: bool,
    pub alignments: Vec<RowAlignment>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: ComparisonStats,
}

#[derive(Debug, Serialize)]
pub struct BatchCompareResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<MatchResult>,
}

/// 批量响应 (v2, 含裁决来源)
#[derive(Debug, Serialize)]
pub struct AdjudicatedBatchResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<AdjudicatedMatch>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 文档解析接口: 原始记录 -> 表头 + 表格
pub async fn parse(Json(req): Json<ParseRequest>) -> Response {
    let fields = crate::service::parse_fields(&req.records);
    tracing::info!(
        "[Parse] {} 条记录 -> {} 个表头, {} 张表",
        req.records.len(),
        fields.headers.len(),
        fields.tables.len()
    );
    (StatusCode::OK, Json(ParseResponse { success: true, fields })).into_response()
}

/// 单对字段比较接口 (同步决策链)
pub async fn compare(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Response {
    let result = state.matcher.compare(&req.val1, &req.val2);
    (StatusCode::OK, Json(CompareResponse { success: true, result })).into_response()
}

/// 表格行对齐接口
pub async fn align(
    State(state): State<AppState>,
    Json(req): Json<AlignRequest>,
) -> Response {
    let alignments = state.aligner.align(&req.table1, &req.table2);
    tracing::info!(
        "[Align] {} x {} 行 -> {} 组对齐",
        req.table1.len(),
        req.table2.len(),
        alignments.len()
    );
    (StatusCode::OK, Json(AlignResponse { success: true, alignments })).into_response()
}

/// 两文档汇总统计接口
pub async fn stats(
    State(state): State<AppState>,
    Json(req): Json<StatsRequest>,
) -> Response {
    let fields1 = crate::service::parse_fields(&req.records1);
    let fields2 = crate::service::parse_fields(&req.records2);
    let stats = state.stats.compute_stats(&fields1, &fields2);
    tracing::info!(
        "[Stats] total={} matches={} diffs={} missing={}",
        stats.total,
        stats.matches,
        stats.diffs,
        stats.missing
    );
    (StatusCode::OK, Json(StatsResponse { success: true, stats })).into_response()
}

/// 批量比较接口 (纯同步决策链)
pub async fn compare_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchCompareRequest>,
) -> Response {
    let results: Vec<MatchResult> = req
        .pairs
        .iter()
        .map(|p| state.matcher.compare(&p.val1, &p.val2))
        .collect();
    let response = BatchCompareResponse {
        success: true,
        message: format!("Compared {} pairs", results.len()),
        results,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 批量比较接口 v2 (含外部裁决, 失败静默回退同步结果)
pub async fn compare_batch_v2(
    State(state): State<AppState>,
    Json(req): Json<BatchCompareRequest>,
) -> Response {
    let results = state.adjudicator.compare_batch(&state.cache, &req.pairs).await;
    let adjudicated = results
        .iter()
        .filter(|r| r.source != crate::models::MatchSource::RuleBased)
        .count();
    let response = AdjudicatedBatchResponse {
        success: true,
        message: format!(
            "Compared {} pairs, {} adjudicated",
            results.len(),
            adjudicated
        ),
        results,
    };
    (StatusCode::OK, Json(response)).into_response()
}
