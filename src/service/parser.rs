use std::collections::HashMap;

use crate::models::{FieldValue, ParsedFields, RawRecord, TableRow};

/// 文档字段解析: 原始抽取记录列表 -> 表头 + 表格。
/// 字段名在整个列表中出现多于一次即为表格字段, 否则为表头字段
/// (只取 rowid == 1 的记录), 两类互斥。
pub fn parse_fields(records: &[RawRecord]) -> ParsedFields {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.fieldname.as_str()).or_insert(0) += 1;
    }

    let mut parsed = ParsedFields::default();
    // 坏 rowid 不能并入任何已有行: 每条坏记录自成一行, 用递减负数 id
    let mut synthetic_row_id: i64 = 0;

    for record in records {
        let is_table = counts.get(record.fieldname.as_str()).copied().unwrap_or(0) > 1;
        let row_id = record.rowid.trim().parse::<i64>();

        if is_table {
            let rows = parsed.tables.entry(record.fieldname.clone()).or_default();
            let row = match row_id {
                Ok(id) => {
                    if let Some(pos) = rows.iter().position(|r| r.row_id == id) {
                        &mut rows[pos]
                    } else {
                        rows.push(TableRow::new(id));
                        rows.last_mut().expect("just pushed")
                    }
                }
                Err(_) => {
                    tracing::warn!(
                        "字段 {} 的 rowid '{}' 不是整数, 按独立行处理",
                        record.fieldname,
                        record.rowid
                    );
                    synthetic_row_id -= 1;
                    rows.push(TableRow::new(synthetic_row_id));
                    rows.last_mut().expect("just pushed")
                }
            };
            row.columns
                .insert(record.columnname.clone(), FieldValue::from_record(record));
        } else if row_id == Ok(1) {
            parsed
                .headers
                .insert(record.fieldname.clone(), FieldValue::from_record(record));
        }
        // 表头字段 rowid != 1 的记录丢弃 (与源系统一致)
    }

    for rows in parsed.tables.values_mut() {
        rows.sort_by_key(|r| r.row_id);
    }

    parsed
}
