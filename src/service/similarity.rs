use std::collections::HashSet;

/// 停用词: 冠词、介词与条款套话 (对内容重合度无信息量)
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "at", "to", "for", "and", "or", "with", "by", "as", "is",
    "are", "be", "per", "any", "all", "noted", "above", "mentioned",
];

/// 经典 Levenshtein 编辑距离, 按字符计算 (非 ASCII 安全), 两行 DP
pub fn levenshtein(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// 编辑距离相似度: 1 - d/max(len), 对称, [0,1], 双空串为 1.0
pub fn string_similarity(s1: &str, s2: &str) -> f64 {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();
    let max_len = len1.max(len2);
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(s1, s2) as f64 / max_len as f64
}

/// 按空白分词并去停用词, 返回去重词元集 (入参应已归一化)
pub fn tokenize(normalized: &str) -> HashSet<&str> {
    normalized
        .split_whitespace()
        .filter(|t| !STOP_WORDS.contains(t))
        .collect()
}

/// 内容重合度: 词元集的 Jaccard 指数, 任一侧无有效词元时为 0
pub fn token_overlap(norm1: &str, norm2: &str) -> f64 {
    let tokens1 = tokenize(norm1);
    let tokens2 = tokenize(norm2);
    if tokens1.is_empty() || tokens2.is_empty() {
        return 0.0;
    }
    let intersection = tokens1.intersection(&tokens2).count();
    let union = tokens1.union(&tokens2).count();
    intersection as f64 / union as f64
}

/// 扩写/截断检查: 短串比长串短 30% 以上, 且短串 85% 以上的去重词元
/// 出现在长串词元集中, 则视为同一条款的省略形式。
/// 阈值由配置传入 (length_ratio=0.70, token_ratio=0.85 为源系统行为)。
pub fn is_expansion(norm1: &str, norm2: &str, length_ratio: f64, token_ratio: f64) -> bool {
    let len1 = norm1.chars().count();
    let len2 = norm2.chars().count();
    let (shorter, longer, short_len, long_len) = if len1 <= len2 {
        (norm1, norm2, len1, len2)
    } else {
        (norm2, norm1, len2, len1)
    };
    if long_len == 0 || (short_len as f64) > (long_len as f64) * length_ratio {
        return false;
    }

    let short_tokens = tokenize(shorter);
    if short_tokens.is_empty() {
        return false;
    }
    let long_tokens = tokenize(longer);
    let contained = short_tokens.iter().filter(|t| long_tokens.contains(*t)).count();
    contained as f64 >= short_tokens.len() as f64 * token_ratio
}
