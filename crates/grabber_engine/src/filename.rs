use sha2::{Digest, Sha256};

/// Windows-safe, deterministic destination filename:
/// `{sanitized_title}--{short_hash(source_url)}.{extension}`.
///
/// The short hash keeps distinct tracks with identical titles apart while
/// repeated resolutions of the same source land on the same path, which is
/// what makes the already-in-library check idempotent.
pub fn destination_filename(title: &str, source_url: &str, extension: &str) -> String {
    let sanitized = sanitize_title(title);
    let hash = short_hash(source_url);
    format!("{sanitized}--{hash}.{extension}")
}

fn sanitize_title(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    let mut compacted = String::with_capacity(replaced.len());
    let mut prev_underscore = false;
    for c in replaced.trim_matches(&['_', ' ', '.'][..]).chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }

    if compacted.is_empty() {
        compacted = "untitled".to_string();
    }
    if compacted.len() > 80 {
        let mut cut = 80;
        while !compacted.is_char_boundary(cut) {
            cut -= 1;
        }
        compacted.truncate(cut);
    }
    if is_reserved_windows_name(&compacted) {
        compacted.push('_');
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
