#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN_WIDTH: usize = 6;
const SEPARATOR: &str = "  ";

/// Render an aligned table of string rows.
#[must_use]
pub fn render_rows(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    shrink_to_fit(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = truncate(row.get(index).map_or("-", String::as_str), *width);
                let padded = pad(&cell, *width, is_numeric(&cell));
                if options.color {
                    colorize(&cell, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line);
    }
    lines.join("\n")
}

/// Narrow the widest columns one character at a time until the table fits.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].len().max(MIN_COLUMN_WIDTH))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, align_right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if align_right {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
}

/// Color lifecycle and presence values; `padded` keeps alignment intact.
fn colorize(cell: &str, padded: String) -> String {
    let code = match cell.to_ascii_lowercase().as_str() {
        "in_progress" | "online" | "true" | "completed" => "32",
        "scheduled" | "away" | "busy" | "pending" => "33",
        "cancelled" | "offline" | "false" | "failed" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}
