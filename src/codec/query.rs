//! Minimal `application/x-www-form-urlencoded` reading: split pairs and undo percent escapes.

/// Decodes `%XX` escapes and `+` as space. Malformed escapes are kept literally.
pub fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(high), Some(low)) => {
                        out.push(high << 4 | low);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Query string from a path or URL (`/calc?x=1` -> `x=1`). A bare query is returned as is.
pub fn query_part(path_or_query: &str) -> &str {
    match path_or_query.split_once('?') {
        Some((_, query)) => query.split('#').next().unwrap_or(query),
        None if path_or_query.starts_with('/') => "",
        None => path_or_query,
    }
}

/// Decoded `(key, value)` pairs in order. Empty segments are skipped; a key without `=` has an
/// empty value.
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (percent_decode(key), percent_decode(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_escapes_and_plus() {
        assert_eq!(percent_decode("2%5Bcruel%2Cferocious%5D%3A5"), "2[cruel,ferocious]:5");
        assert_eq!(percent_decode("a+b"), "a b");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz1"), "%zz1");
    }

    #[test]
    fn pairs_keep_order_and_repeats() {
        let pairs = query_pairs("?encounter=1:1&x&encounter=2:3&");
        assert_eq!(
            pairs,
            vec![
                ("encounter".to_string(), "1:1".to_string()),
                ("x".to_string(), String::new()),
                ("encounter".to_string(), "2:3".to_string()),
            ]
        );
    }

    #[test]
    fn query_part_strips_path_and_fragment() {
        assert_eq!(query_part("/calc?encounter=1:1#top"), "encounter=1:1");
        assert_eq!(query_part("/calc"), "");
        assert_eq!(query_part("encounter=1:1"), "encounter=1:1");
    }
}
