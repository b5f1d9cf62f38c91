//! Best-effort display normalization for streamed CJK text.
//!
//! Model output sometimes arrives with stray ASCII whitespace between
//! ideographs, an artifact of token joining. [`collapse_cjk_whitespace`]
//! removes whitespace runs whose neighbors are both CJK ideographs, line by
//! line, and leaves anything that could be formatted content alone: fenced
//! code blocks, indented lines, and headings pass through untouched. It is
//! deliberately not part of the stream decoding path; callers opt in via
//! configuration and apply it to finalized text only.

pub fn collapse_cjk_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_fence = false;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            out.push_str(line);
            continue;
        }
        if in_fence
            || line.starts_with(' ')
            || line.starts_with('\t')
            || trimmed.starts_with('#')
        {
            out.push_str(line);
            continue;
        }
        collapse_line(line, &mut out);
    }
    out
}

fn collapse_line(line: &str, out: &mut String) {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != ' ' && c != '\t' {
            out.push(c);
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
            i += 1;
        }
        let prev = out.chars().last();
        let next = chars.get(i).copied();
        let between_ideographs = matches!((prev, next), (Some(p), Some(n)) if is_cjk(p) && is_cjk(n));
        if !between_ideographs {
            out.extend(chars[start..i].iter());
        }
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x3400..=0x4DBF        // CJK Extension A
        | 0x4E00..=0x9FFF      // CJK Unified Ideographs
        | 0xF900..=0xFAFF      // CJK Compatibility Ideographs
    )
}
