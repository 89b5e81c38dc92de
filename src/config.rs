use serde::{Deserialize, Serialize};

/// 模糊匹配进入 Match/High 的下限 (经验值, 保持与源系统行为一致)
pub const DEFAULT_HIGH_SIMILARITY: f64 = 0.75;
/// 模糊匹配进入 Ambiguous 区间的下限
pub const DEFAULT_AMBIGUOUS_SIMILARITY: f64 = 0.55;
/// 行内容对齐接受阈值 (偏召回: 错并可人工纠正, 漏配会掩盖真实匹配)
pub const DEFAULT_ROW_SIMILARITY_THRESHOLD: f64 = 0.4;
/// 包含检查: 短串至少比长串短 30%
pub const DEFAULT_CONTAINMENT_LENGTH_RATIO: f64 = 0.70;
/// 包含检查: 短串 85% 以上的去重词元需出现在长串中
pub const DEFAULT_CONTAINMENT_TOKEN_RATIO: f64 = 0.85;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub matching: MatchConfig,
    pub adjudicator: AdjudicatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// 匹配阈值配置 - 均为具名可覆盖常量
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub high_similarity: f64,
    pub ambiguous_similarity: f64,
    pub row_similarity_threshold: f64,
    pub containment_length_ratio: f64,
    pub containment_token_ratio: f64,
    /// 管理类字段名单 (统计与展示时跳过), 按小写精确匹配
    pub ignored_fields: Vec<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            high_similarity: DEFAULT_HIGH_SIMILARITY,
            ambiguous_similarity: DEFAULT_AMBIGUOUS_SIMILARITY,
            row_similarity_threshold: DEFAULT_ROW_SIMILARITY_THRESHOLD,
            containment_length_ratio: DEFAULT_CONTAINMENT_LENGTH_RATIO,
            containment_token_ratio: DEFAULT_CONTAINMENT_TOKEN_RATIO,
            ignored_fields: Vec::new(),
        }
    }
}

impl MatchConfig {
    pub fn should_ignore_field(&self, field_name: &str) -> bool {
        let lower = field_name.trim().to_lowercase();
        self.ignored_fields.iter().any(|f| f.to_lowercase() == lower)
    }
}

/// 外部裁决服务配置 - endpoint 缺省时裁决层整体停用
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjudicatorConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub timeout_secs: u64,
    pub cache_capacity: usize,
}

impl Default for AdjudicatorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            batch_size: 5,
            batch_delay_ms: 200,
            timeout_secs: 10,
            cache_capacity: 1000,
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 <- docdiff.toml (可选) <- DOCDIFF__* 环境变量
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("docdiff").required(false))
            .add_source(config::Environment::with_prefix("DOCDIFF").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }
}
