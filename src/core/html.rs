// src/core/html.rs
//! Tolerant, case-insensitive scanning over raw markup.
//! No DOM: we slice known blocks and read text out of them.

/// ASCII-only lowercase. Byte offsets in the result line up with the input,
/// so positions found in the lowered copy index the original.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Position of the next `<name` opener at/after `from` whose name ends right there
/// (so `<th` does not match `<thead`). `lc` must be `to_lower(s)`.
fn find_open(lc: &str, name: &str, from: usize) -> Option<usize> {
    let pat = join!("<", name);
    let mut at = from;
    loop {
        let rel = lc.get(at..)?.find(&pat)?;
        let start = at + rel;
        let next = lc.as_bytes().get(start + pat.len()).copied();
        match next {
            Some(b) if b.is_ascii_alphanumeric() || b == b'-' => at = start + pat.len(),
            Some(_) => return Some(start),
            None => return None,
        }
    }
}

/// Every element among `names` in document order, as `(name index, block)`.
/// Same-name nesting is not tracked; use `find_region` for nested regions.
pub fn elements_ci<'a>(s: &'a str, names: &[&str]) -> Vec<(usize, &'a str)> {
    let lc = to_lower(s);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((idx, start, end)) = next_element_lc(&lc, names, pos) {
        out.push((idx, &s[start..end]));
        pos = end;
    }
    out
}

/// Next element among `names` (earliest opener wins), as `(name index, start, end)`.
/// `end` is just past the matching `</name>`.
fn next_element_lc(lc: &str, names: &[&str], from: usize) -> Option<(usize, usize, usize)> {
    let (idx, start) = names
        .iter()
        .enumerate()
        .filter_map(|(i, n)| find_open(lc, n, from).map(|p| (i, p)))
        .min_by_key(|(_, p)| *p)?;

    let open_end = lc[start..].find('>')? + start + 1;
    let close = join!("</", names[idx]);
    let close_rel = lc[open_end..].find(&close)?;
    let close_start = open_end + close_rel;
    let end = lc[close_start..].find('>').map(|e| close_start + e + 1).unwrap_or(lc.len());
    Some((idx, start, end))
}

/// Every `<tag>` whose class list has `class`, from its opener to the first `</tag>`
/// after it. Unlike `elements_ci`, openers nested inside other `<tag>`s are found too.
pub fn class_blocks_ci<'a>(s: &'a str, tag: &str, class: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let close = join!("</", tag);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(start) = find_open(&lc, tag, pos) {
        pos = start + 1;
        if !has_class(&s[start..], class) {
            continue;
        }
        let Some(close_rel) = lc[start..].find(&close) else { break };
        let close_start = start + close_rel;
        let end = lc[close_start..].find('>').map(|e| close_start + e + 1).unwrap_or(lc.len());
        out.push(&s[start..end]);
    }
    out
}

/// Full element starting at `start` (which must point at `<name`), honouring nesting
/// of the same tag. Returns the end offset just past the matching close tag.
fn element_at(lc: &str, name: &str, start: usize) -> Option<usize> {
    let close = join!("</", name);
    let mut depth = 0usize;
    let mut pos = start;
    loop {
        let next_open = find_open(lc, name, pos);
        let next_close = lc.get(pos..)?.find(&close).map(|r| pos + r)?;
        match next_open {
            Some(o) if o < next_close => {
                depth += 1;
                pos = o + 1;
            }
            _ => {
                depth = depth.saturating_sub(1);
                let end = lc[next_close..].find('>').map(|e| next_close + e + 1)?;
                if depth == 0 {
                    return Some(end);
                }
                pos = end;
            }
        }
    }
}

/// The opening tag text (`<tr class=... data-row="3">`) of a block.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(e) => &block[..=e],
        None => block,
    }
}

/// Value of `attr` in the opening tag of `block`. Quoted or bare values.
pub fn attr_value(block: &str, attr: &str) -> Option<String> {
    let tag = open_tag(block);
    let lc = to_lower(tag);
    let needle = join!(&to_lower(attr), "=");

    let mut at = 0usize;
    let pos = loop {
        let rel = lc.get(at..)?.find(&needle)?;
        let p = at + rel;
        // attribute names start after whitespace; avoid `data-row` matching `row=`
        if p > 0 && lc.as_bytes()[p - 1].is_ascii_whitespace() {
            break p;
        }
        at = p + needle.len();
    };

    let val = tag[pos + needle.len()..].trim_start();
    let (quote, off) = match val.as_bytes().first() {
        Some(b'"') => (Some('"'), 1),
        Some(b'\'') => (Some('\''), 1),
        _ => (None, 0),
    };
    let end = match quote {
        Some(q) => val[off..].find(q).map(|e| off + e),
        None => val.find(|c: char| c.is_ascii_whitespace() || c == '>'),
    }
    .unwrap_or(val.len());
    Some(val[off..end].to_string())
}

/// True if the opening tag's class list contains `token`.
pub fn has_class(block: &str, token: &str) -> bool {
    attr_value(block, "class")
        .map(|c| c.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
        .unwrap_or(false)
}

/// Locate a region: the first element whose `id` equals `region`, or failing that,
/// whose class list contains `region`. Commented-out markup is searched too, since
/// pages often ship secondary tables inside `<!-- -->`.
pub fn find_region<'a>(doc: &'a str, region: &str) -> Option<&'a str> {
    let lc = to_lower(doc);
    let region_lc = to_lower(region);

    let by_id = [
        format!(r#"id="{}""#, region_lc),
        format!("id='{}'", region_lc),
        format!("id={}", region_lc),
    ];
    for needle in &by_id {
        let mut at = 0usize;
        while let Some(rel) = lc[at..].find(needle.as_str()) {
            let hit = at + rel;
            at = hit + needle.len();
            // exact id, not a prefix of a longer one
            let after = lc.as_bytes().get(hit + needle.len()).copied();
            if needle.ends_with(region_lc.as_str()) && matches!(after, Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'-') {
                continue;
            }
            if let Some(found) = enclosing_element(doc, &lc, hit) {
                return Some(found);
            }
        }
    }

    // class token fallback
    let mut at = 0usize;
    while let Some(rel) = lc[at..].find(region_lc.as_str()) {
        let hit = at + rel;
        at = hit + region_lc.len();
        let Some(start) = lc[..hit].rfind('<') else { continue };
        if lc[start..hit].contains('>') {
            continue; // hit is in text, not inside a tag
        }
        let block = &doc[start..];
        if has_class(block, region) {
            if let Some(found) = enclosing_element(doc, &lc, hit) {
                return Some(found);
            }
        }
    }
    None
}

/// The element whose opening tag contains byte offset `inside`.
fn enclosing_element<'a>(doc: &'a str, lc: &str, inside: usize) -> Option<&'a str> {
    let start = lc[..inside].rfind('<')?;
    let name: String = lc[start + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if name.is_empty() {
        return None;
    }
    let end = element_at(lc, &name, start)?;
    Some(&doc[start..end])
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Drop tags, decode common entities, collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&super::sanitize::normalize_entities(&out))
}

/// Visible text of a block.
pub fn text_of(block: &str) -> String {
    strip_tags(inner_after_open_tag(block))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_element_skips_longer_tag_names() {
        let s = "<thead><tr><th>Rk</th><td>1</td></tr></thead>";
        assert_eq!(elements_ci(s, &["th", "td"]), vec![(0, "<th>Rk</th>"), (1, "<td>1</td>")]);
    }

    #[test]
    fn elements_ci_walks_rows_in_order() {
        let s = "<table><tr data-row=0><td>a</td></tr><TR data-row=1><td>b</td></TR></table>";
        let rows = elements_ci(s, &["tr"]);
        assert_eq!(rows.len(), 2);
        assert!(rows[1].1.starts_with("<TR"));
        assert_eq!(text_of(rows[1].1), "b");
    }

    #[test]
    fn attr_value_variants() {
        let b = r#"<tr data-row="12" class='thead over'>"#;
        assert_eq!(attr_value(b, "data-row").as_deref(), Some("12"));
        assert_eq!(attr_value(b, "class").as_deref(), Some("thead over"));
        assert_eq!(attr_value("<tr data-row=4>", "data-row").as_deref(), Some("4"));
        // `row=` must not hit `data-row=`
        assert_eq!(attr_value(b, "row"), None);
        assert!(has_class(b, "thead"));
        assert!(!has_class(b, "the"));
    }

    #[test]
    fn find_region_by_id_handles_nesting_and_comments() {
        let doc = r#"
            <div id="stats_standard_wrap"><table id="stats_standard"><tr><td>
              <table class="inner"><tr><td>x</td></tr></table>
            </td></tr></table></div>
            <!-- <table id="stats_keeper"><tr><td>k</td></tr></table> -->
        "#;
        let t = find_region(doc, "stats_standard").unwrap();
        assert!(t.starts_with(r#"<table id="stats_standard">"#));
        assert!(t.ends_with("</table>"));
        assert!(t.contains("inner"));

        let k = find_region(doc, "stats_keeper").unwrap();
        assert!(k.contains(">k<"));
        assert!(find_region(doc, "stats_misc").is_none());
    }

    #[test]
    fn find_region_by_class_token() {
        let doc = r#"<p>similar-players-table</p>
            <table class="table leaguetable similar-players-table mb-0"><tr><td>a</td></tr></table>"#;
        let t = find_region(doc, "similar-players-table").unwrap();
        assert!(t.starts_with("<table class="));
    }

    #[test]
    fn class_blocks_find_nested_openers() {
        let s = r#"<div class="row"><div class="text"><a title="A">A</a></div></div>
                   <div class="text"><a title="B">B</a></div>"#;
        let blocks = class_blocks_ci(s, "div", "text");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("title=\"A\""));
        assert!(blocks[1].ends_with("</div>"));
    }

    #[test]
    fn text_of_decodes_and_collapses() {
        assert_eq!(text_of("<td> <a href='x'>Bruno&nbsp;Fernandes</a>\n</td>"), "Bruno Fernandes");
        assert_eq!(text_of("<td></td>"), "");
    }
}
