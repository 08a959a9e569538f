//! CSV行の読み書き（ダブルクォート対応）

/// CSV行をパース
///
/// ダブルクォートで囲まれたフィールド内のカンマと `""`（エスケープ）を扱う
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(finish_field(&field));
                field.clear();
            }
            _ => field.push(c),
        }
    }
    fields.push(finish_field(&field));

    fields
}

fn finish_field(field: &str) -> String {
    field.trim_end_matches(['\r', '\n']).to_string()
}

/// フィールドをCSV用にエスケープ
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) || value.starts_with(' ') || value.ends_with(' ') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// フィールド列を1行に連結（改行なし）
pub fn format_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_plain() {
        assert_eq!(parse_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_line_quoted_comma() {
        assert_eq!(
            parse_line(r#""Photorealistic, cinematic",noir"#),
            vec!["Photorealistic, cinematic", "noir"]
        );
    }

    #[test]
    fn test_parse_line_escaped_quote() {
        assert_eq!(
            parse_line(r#""The headline ""URBAN"" in bold",x"#),
            vec![r#"The headline "URBAN" in bold"#, "x"]
        );
    }

    #[test]
    fn test_parse_line_empty_fields() {
        assert_eq!(parse_line("a,,\"\""), vec!["a", "", ""]);
    }

    #[test]
    fn test_parse_line_crlf() {
        assert_eq!(parse_line("a,b\r"), vec!["a", "b"]);
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_line_parses_back() {
        let fields = ["2026-01-01T00:00:00", "gpt-oss:20b", "a \"quoted\", value", ""];
        let line = format_line(&fields);
        assert_eq!(parse_line(&line), fields);
    }
}
