use crate::models::Capture;

const HEADER: &str = "kind,name,description,latitude,longitude,length_m,area_m2,created_at";

/// One row per vertex; points produce a single row
pub(super) fn write(captures: &[Capture]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for capture in captures {
        let length = capture.length().map(|d| d.to_string()).unwrap_or_default();
        let area = capture.area().map(|a| a.to_string()).unwrap_or_default();
        let created_at = capture.created_at.to_rfc3339();

        for coordinate in capture.coordinates() {
            let row = [
                capture.kind().as_str(),
                &field(capture.name()),
                &field(capture.description()),
                &coordinate.lat.to_string(),
                &coordinate.lon.to_string(),
                &length,
                &area,
                &created_at,
            ];
            out.push_str(&row.join(","));
            out.push('\n');
        }
    }

    out
}

/// Quote a field when it holds a delimiter, quote or line break
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    #[test]
    fn test_one_row_per_vertex() {
        let captures = vec![
            Capture::point("Pino", "", Coordinate::new(24.0, -104.6)).unwrap(),
            Capture::line(
                "Brecha",
                vec![Coordinate::new(24.0, -104.6), Coordinate::new(24.01, -104.6)],
            )
            .unwrap(),
        ];

        let csv = write(&captures);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("point,Pino,,24,-104.6,,,"));
        assert!(lines[2].starts_with("line,Brecha,,24,-104.6,"));
        assert!(lines[3].starts_with("line,Brecha,,24.01,-104.6,"));
    }

    #[test]
    fn test_fields_are_quoted() {
        assert_eq!(field("plain"), "plain");
        assert_eq!(field("Pino, ocote"), "\"Pino, ocote\"");
        assert_eq!(field("dijo \"alto\""), "\"dijo \"\"alto\"\"\"");
    }
}
