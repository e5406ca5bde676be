use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Columns shown first, in this order, when present.
const LEADING_COLUMNS: &[&str] = &[
    "id",
    "title",
    "name",
    "displayName",
    "lifecycleState",
    "presence",
    "scheduledStart",
    "role",
];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: &Value) -> anyhow::Result<String> {
    match value {
        Value::Array(items) => Ok(render_list(items)),
        Value::Object(map) => Ok(render_object(map)),
        scalar => Ok(table::render_rows(
            &["value"],
            &[vec![cell(scalar)]],
            options(),
        )),
    }
}

/// Objects wrapping a single list (`sessions`, `attendees`) render the list
/// under a summary line of the remaining scalar fields.
fn render_object(map: &Map<String, Value>) -> String {
    let lists: Vec<(&String, &Vec<Value>)> = map
        .iter()
        .filter_map(|(key, value)| value.as_array().map(|items| (key, items)))
        .filter(|(_, items)| items.iter().all(Value::is_object))
        .collect();

    if let [(list_key, items)] = lists.as_slice() {
        let summary = map
            .iter()
            .filter(|(key, value)| key != list_key && !value.is_array() && !value.is_object())
            .map(|(key, value)| format!("{key}={}", cell(value)))
            .collect::<Vec<_>>()
            .join("  ");
        return format!("{summary}\n\n{}", render_list(items));
    }

    let mut entries = map.iter().collect::<Vec<_>>();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let rows = entries
        .into_iter()
        .map(|(key, value)| vec![key.clone(), cell(value)])
        .collect::<Vec<_>>();
    table::render_rows(&["key", "value"], &rows, options())
}

fn render_list(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_rows(&["value"], &rows, options());
    }

    let headers = column_order(items);
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    table::render_rows(&header_refs, &rows, options())
}

fn column_order(items: &[Value]) -> Vec<String> {
    let mut rest = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !rest.contains(key) {
                rest.push(key.clone());
            }
        }
    }
    rest.sort();

    let mut headers: Vec<String> = LEADING_COLUMNS
        .iter()
        .filter(|column| rest.iter().any(|key| key == *column))
        .map(|column| (*column).to_string())
        .collect();
    rest.retain(|key| !headers.contains(key));
    headers.extend(rest);
    headers
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_json::json;

    use super::{column_order, render};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        value: u32,
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&Example { id: "x", value: 7 }, OutputFormat::Json).expect("json render");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "x");
        assert_eq!(parsed["value"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&Example { id: "x", value: 7 }, OutputFormat::Raw).expect("raw render");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_for_object_is_key_value() {
        let out = render(&Example { id: "x", value: 7 }, OutputFormat::Table).expect("table");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("value"));
    }

    #[test]
    fn leading_columns_come_first() {
        let items = vec![json!({
            "batchId": "b-1",
            "title": "Algebra",
            "lifecycleState": "scheduled",
            "id": "lec-1",
        })];
        assert_eq!(
            column_order(&items),
            vec!["id", "title", "lifecycleState", "batchId"]
        );
    }

    #[test]
    fn wrapped_list_renders_summary_and_rows() {
        let value = json!({
            "bucket": "today",
            "total": 1,
            "sessions": [{ "id": "lec-1", "title": "Algebra" }],
        });
        let out = render(&value, OutputFormat::Table).expect("table");
        let first = out.lines().next().unwrap();
        assert!(first.contains("bucket=today"));
        assert!(first.contains("total=1"));
        assert!(out.contains("lec-1"));
    }
}
