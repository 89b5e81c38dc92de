use axum::{
    routing::{get, post},
    Router,
};
use policy_docdiff_rust::api::{self, AppState};
use policy_docdiff_rust::service::{
    AdjudicationCache, Adjudicator, FieldMatcher, RowAligner, StatsCalculator,
};
use policy_docdiff_rust::AppConfig;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置: 默认值 <- docdiff.toml <- DOCDIFF__* 环境变量
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 同步匹配栈 + 异步裁决层
    let state = AppState {
        matcher: Arc::new(FieldMatcher::new(config.matching.clone())),
        aligner: Arc::new(RowAligner::new(config.matching.clone())),
        stats: Arc::new(StatsCalculator::new(config.matching.clone())),
        adjudicator: Arc::new(Adjudicator::new(
            config.adjudicator.clone(),
            config.matching.clone(),
        )),
        cache: Arc::new(AdjudicationCache::new(config.adjudicator.cache_capacity)),
    };

    // 构建路由
    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/parse", post(api::parse))
        .route("/api/compare", post(api::compare))
        .route("/api/align", post(api::align))
        .route("/api/stats", post(api::stats))
        .route("/api/compare/batch", post(api::compare_batch))
        .route("/api/compare/batch/v2", post(api::compare_batch_v2))
        .layer(ServiceBuilder::new())
        .with_state(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/parse              - 原始记录解析");
    info!("  POST /api/compare            - 单对字段比较");
    info!("  POST /api/align              - 表格行对齐");
    info!("  POST /api/stats              - 两文档汇总统计");
    info!("  POST /api/compare/batch      - 批量比较 (同步)");
    info!("  POST /api/compare/batch/v2   - 批量比较 (含外部裁决)");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
