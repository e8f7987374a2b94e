//! CSV rendering with minimal quoting.

use crate::domain::Value;

/// Render a header record followed by one record per row, each ending in `\n`.
///
/// NULL becomes an empty field; blobs become their placeholder text.
#[must_use]
pub fn render(columns: &[String], rows: &[Vec<Value>]) -> String {
    let mut out = String::new();
    push_record(&mut out, columns.iter().map(String::as_str));
    for row in rows {
        let fields: Vec<String> = row.iter().map(field).collect();
        push_record(&mut out, fields.iter().map(String::as_str));
    }
    out
}

fn field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for value in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape(value));
    }
    out.push('\n');
}

/// Quote a field only when it contains a comma, quote, or line break.
#[must_use]
pub fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_first_then_rows() {
        let out = render(
            &["id".to_string(), "name".to_string()],
            &[
                vec![Value::Integer(1), Value::from("Alice")],
                vec![Value::Integer(2), Value::Null],
            ],
        );
        assert_eq!(out, "id,name\n1,Alice\n2,\n");
    }

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn blobs_render_as_placeholder() {
        let out = render(&["b".to_string()], &[vec![Value::Blob(vec![7; 16])]]);
        assert_eq!(out, "b\n<BLOB 16 bytes>\n");
    }
}
