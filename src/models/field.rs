use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 原始抽取记录 (RawRecord) - 外部抽取服务的 JSON 格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub fieldname: String,
    pub rowid: String,     // 整数字符串, 解析失败时容错处理
    pub columnname: String,
    pub extracteddata: String,
    pub confidencescore: f64,
    pub confidenceflag: String,
}

/// 字段值 (FieldValue)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: String,
    pub confidence: f64,
    pub flag: String,
}

impl FieldValue {
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            value: record.extracteddata.clone(),
            confidence: record.confidencescore,
            flag: record.confidenceflag.clone(),
        }
    }
}

/// 表格行 (TableRow) - 列按插入顺序保序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub row_id: i64,
    pub columns: IndexMap<String, FieldValue>,
}

impl TableRow {
    pub fn new(row_id: i64) -> Self {
        Self {
            row_id,
            columns: IndexMap::new(),
        }
    }

    /// 取某列的值, 列缺失或行缺失时返回空串
    pub fn column_value(&self, column: &str) -> &str {
        self.columns.get(column).map(|v| v.value.as_str()).unwrap_or("")
    }
}

/// 解析后的文档字段 (ParsedFields) - headers/tables 均保序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedFields {
    pub headers: IndexMap<String, FieldValue>,
    pub tables: IndexMap<String, Vec<TableRow>>,
}

impl ParsedFields {
    /// 取某表头字段的值, 字段缺失时返回空串
    pub fn header_value(&self, field: &str) -> &str {
        self.headers.get(field).map(|v| v.value.as_str()).unwrap_or("")
    }
}
