//! Helpers for the `geoviewer` command-line tool.

use foundation::{CoordinateError, LatLng};
use runtime::{Notice, NoticeLevel};
use scene::{AttributeRow, AttributeTable};

/// Parses `lat,lng;lat,lng;...` into a ring.
pub fn parse_ring(raw: &str) -> Result<Vec<LatLng>, CoordinateError> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (lat, lng) = pair
                .split_once(',')
                .ok_or_else(|| CoordinateError::Unparseable(pair.to_string()))?;
            LatLng::parse(lat, lng)
        })
        .collect()
}

/// Tab-separated rendering: a `#` column, then one column per header.
pub fn format_table(table: &AttributeTable) -> String {
    let mut out = String::new();
    if !table.headers.is_empty() {
        out.push('#');
        for h in &table.headers {
            out.push('\t');
            out.push_str(h);
        }
        out.push('\n');
    }
    for row in &table.rows {
        match row {
            AttributeRow::Feature { number, cells } => {
                out.push_str(&number.to_string());
                for c in cells {
                    out.push('\t');
                    out.push_str(c);
                }
            }
            AttributeRow::Placeholder { text } => out.push_str(text),
        }
        out.push('\n');
    }
    out
}

pub fn format_notice(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("[{level}] {}", notice.message)
}

#[cfg(test)]
mod tests {
    use super::{format_table, parse_ring};
    use foundation::{CoordinateError, LatLng};
    use pretty_assertions::assert_eq;
    use scene::{AttributeRow, AttributeTable};

    #[test]
    fn ring_from_pairs() {
        assert_eq!(
            parse_ring("-22,16.5; -22,17.5;-23,17.5;").unwrap(),
            vec![
                LatLng::new(-22.0, 16.5),
                LatLng::new(-22.0, 17.5),
                LatLng::new(-23.0, 17.5),
            ]
        );
        assert_eq!(
            parse_ring("-22 16.5"),
            Err(CoordinateError::Unparseable("-22 16.5".to_string()))
        );
    }

    #[test]
    fn table_text() {
        let table = AttributeTable {
            headers: vec!["NAME".into(), "AGE".into()],
            rows: vec![AttributeRow::Feature {
                number: 1,
                cells: vec!["Damara".into(), "".into()],
            }],
        };
        assert_eq!(format_table(&table), "#\tNAME\tAGE\n1\tDamara\t\n");
        assert_eq!(
            format_table(&AttributeTable::from_features(&[])),
            "No features found\n"
        );
    }
}
