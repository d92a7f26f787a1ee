// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Entity key: drop everything that is not a word character or whitespace,
/// then collapse whitespace. Letters with diacritics are word characters and stay.
/// "Martin Ødegaard" → "Martin Ødegaard", "N'Golo Kanté" → "NGolo Kanté".
pub fn clean_entity_key(s: &str) -> String {
    let kept: String = s
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    normalize_ws(&kept)
}

/// First whitespace-separated token, or the whole string when it has none.
pub fn first_token(s: &str) -> &str {
    s.split_whitespace().next().unwrap_or(s)
}

/// "1,234" → 1234. Anything unparseable coerces to 0.
pub fn parse_grouped_int(s: &str) -> i64 {
    let digits: String = s.trim().chars().filter(|c| *c != ',').collect();
    if let Ok(v) = digits.parse::<i64>() {
        return v;
    }
    digits.parse::<f64>().map(|f| f as i64).unwrap_or(0)
}

/// Keep only ASCII alphanumerics, '-' and '_' for file stems.
pub fn sanitize_file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' { out.push(ch); last_us = false; }
        else if !last_us { out.push('_'); last_us = true; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!("table") } else { out }
}
