//! Output formatting for scan sessions.
//!
//! Formats: styled terminal table + cards (see `styled_output`), a
//! standalone HTML page reproducing the dashboard, CSV, and the structured
//! JSON / YAML report (see `structured_output`). All of them render labels
//! through `Labels` so `--lang vi` applies everywhere except the
//! machine-readable formats.

use std::fmt::Write as _;
use std::io;

use crate::classify::{Category, Verdict};
use crate::cli::{Language, OutputFormat};
use crate::metadata::{UNKNOWN, UNRESOLVED};
use crate::record::ScanRecord;
use crate::scanner::ScanSession;
use crate::structured_output::ScanReport;
use crate::styled_output::StyledFormatter;

/// Dashboard card colours.
pub const SAFE_COLOR: &str = "#4CAF50";
pub const ALERT_COLOR: &str = "#FF5252";

/// Human-facing labels in one language.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub language: Language,
}

impl Labels {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    fn vi(&self) -> bool {
        self.language == Language::Vi
    }

    pub fn category(&self, category: Category) -> &'static str {
        if self.vi() {
            category.label_vi()
        } else {
            category.label()
        }
    }

    pub fn verdict(&self, verdict: &Verdict) -> String {
        match (verdict, self.vi()) {
            (Verdict::Safe, false) => "Safe".to_string(),
            (Verdict::Safe, true) => "An toàn".to_string(),
            (Verdict::Suspicious(c), false) => format!("Suspicious: {}", self.category(*c)),
            (Verdict::Suspicious(c), true) => format!("Nghi ngờ: {}", self.category(*c)),
            (Verdict::Unreachable, false) => "Could not retrieve".to_string(),
            (Verdict::Unreachable, true) => "Không lấy được".to_string(),
        }
    }

    /// Category column: flagged category, "Safe", or "-" for unreachable.
    pub fn category_column(&self, record: &ScanRecord) -> String {
        match record.verdict {
            Verdict::Suspicious(c) => self.category(c).to_string(),
            Verdict::Safe => {
                let label = if self.vi() { "An toàn" } else { "Safe" };
                label.to_string()
            }
            Verdict::Unreachable => "-".to_string(),
        }
    }

    /// Translate sentinels; real values pass through.
    pub fn value<'a>(&self, value: &'a str) -> &'a str {
        match (value, self.vi()) {
            (UNKNOWN, true) => "Không xác định",
            (UNRESOLVED, true) => "Chưa phân giải",
            _ => value,
        }
    }

    pub fn domain<'a>(&self, record: &'a ScanRecord) -> &'a str {
        record.domain.as_deref().unwrap_or("-")
    }

    pub fn headers(&self) -> Vec<String> {
        let fixed: [&str; 5] = if self.vi() {
            ["URL", "Tên miền", "Nhà đăng ký", "Quốc gia", "IP"]
        } else {
            ["URL", "Domain", "Registrar", "Country", "IP"]
        };
        let mut headers: Vec<String> = fixed.iter().map(|s| s.to_string()).collect();
        headers.extend(Category::ALL.iter().map(|c| self.category(*c).to_string()));
        if self.vi() {
            headers.push("Kết quả".to_string());
            headers.push("Loại nghi ngờ".to_string());
        } else {
            headers.push("Verdict".to_string());
            headers.push("Category".to_string());
        }
        headers
    }

    /// One table row, same column order as `headers`.
    pub fn row(&self, record: &ScanRecord) -> Vec<String> {
        let mut row = vec![
            record.url.clone(),
            self.domain(record).to_string(),
            self.value(&record.registrar).to_string(),
            self.value(&record.country).to_string(),
            self.value(&record.ip).to_string(),
        ];
        row.extend(record.scores.iter().map(|(_, s)| s.to_string()));
        row.push(self.verdict(&record.verdict));
        row.push(self.category_column(record));
        row
    }

    pub fn title(&self) -> &'static str {
        if self.vi() {
            "Kết quả phân tích"
        } else {
            "Scan results"
        }
    }

    pub fn done(&self) -> &'static str {
        if self.vi() {
            "Quét xong toàn bộ!"
        } else {
            "Scan complete!"
        }
    }

    /// Card field names: URL, verdict, country, IP, category.
    pub fn card_fields(&self) -> [&'static str; 5] {
        if self.vi() {
            ["URL", "Kết quả", "Quốc gia", "IP", "Loại nghi ngờ"]
        } else {
            ["URL", "Verdict", "Country", "IP", "Category"]
        }
    }
}

/// Output formatter trait
pub trait OutputFormatter {
    /// Render a whole session
    fn format_session(&self, session: &ScanSession) -> io::Result<String>;

    /// Get the file extension for this format
    fn file_extension(&self) -> &'static str;
}

/// CSV output formatter
pub struct CsvFormatter {
    include_header: bool,
    labels: Labels,
}

impl CsvFormatter {
    pub fn new(include_header: bool, labels: Labels) -> Self {
        Self {
            include_header,
            labels,
        }
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_session(&self, session: &ScanSession) -> io::Result<String> {
        let mut output = String::new();

        if self.include_header {
            output.push_str(&csv_line(&self.labels.headers()));
        }
        for record in session.records() {
            output.push_str(&csv_line(&self.labels.row(record)));
        }

        Ok(output)
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }
}

fn csv_line(fields: &[String]) -> String {
    let escaped: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    format!("{}\n", escaped.join(","))
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Standalone HTML page: results table plus one coloured card per URL.
pub struct HtmlFormatter {
    labels: Labels,
}

impl HtmlFormatter {
    pub fn new(labels: Labels) -> Self {
        Self { labels }
    }

    fn write_page(&self, out: &mut String, session: &ScanSession) -> std::fmt::Result {
        let l = &self.labels;
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>Website Scanner</title>")?;
        writeln!(
            out,
            "<style>body{{font-family:sans-serif;margin:24px}}table{{border-collapse:collapse}}\
             th,td{{border:1px solid #ddd;padding:4px 8px}}th{{background:#f4f4f4}}\
             .card{{padding:12px;margin:6px 0;border-radius:10px;color:white}}</style>"
        )?;
        writeln!(out, "</head>\n<body>")?;
        writeln!(out, "<h2>{}</h2>", escape_html(l.title()))?;

        writeln!(out, "<table>\n<tr>")?;
        for h in l.headers() {
            writeln!(out, "  <th>{}</th>", escape_html(&h))?;
        }
        writeln!(out, "</tr>")?;
        for record in session.records() {
            writeln!(out, "<tr>")?;
            for cell in l.row(record) {
                writeln!(out, "  <td>{}</td>", escape_html(&cell))?;
            }
            writeln!(out, "</tr>")?;
        }
        writeln!(out, "</table>")?;

        let [f_url, f_verdict, f_country, f_ip, f_category] = l.card_fields();
        for record in session.records() {
            let color = if record.verdict.is_safe() {
                SAFE_COLOR
            } else {
                ALERT_COLOR
            };
            writeln!(out, "<div class=\"card\" style=\"background:{color}\">")?;
            writeln!(out, "  <b>{f_url}:</b> {}<br>", escape_html(&record.url))?;
            writeln!(
                out,
                "  <b>{f_verdict}:</b> {}<br>",
                escape_html(&l.verdict(&record.verdict))
            )?;
            writeln!(
                out,
                "  <b>{f_country}:</b> {}<br>",
                escape_html(l.value(&record.country))
            )?;
            writeln!(out, "  <b>{f_ip}:</b> {}<br>", escape_html(l.value(&record.ip)))?;
            writeln!(
                out,
                "  <b>{f_category}:</b> {}",
                escape_html(&l.category_column(record))
            )?;
            writeln!(out, "</div>")?;
        }

        let s = session.summary();
        writeln!(
            out,
            "<p>{} ({} / {} / {})</p>",
            escape_html(l.done()),
            s.safe,
            s.suspicious,
            s.unreachable
        )?;
        writeln!(out, "</body>\n</html>")
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_session(&self, session: &ScanSession) -> io::Result<String> {
        let mut out = String::new();
        self.write_page(&mut out, session)
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(out)
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }
}

/// Minimal HTML text escaping.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON / YAML structured report.
pub struct StructuredFormatter {
    yaml: bool,
}

impl OutputFormatter for StructuredFormatter {
    fn format_session(&self, session: &ScanSession) -> io::Result<String> {
        let report = ScanReport::from_session(session);
        let text = if self.yaml {
            report.to_yaml()
        } else {
            report.to_json()
        };
        text.map(|t| format!("{}\n", t.trim_end()))
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn file_extension(&self) -> &'static str {
        if self.yaml { "yaml" } else { "json" }
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(
    format: OutputFormat,
    language: Language,
    use_colors: bool,
) -> Box<dyn OutputFormatter> {
    let labels = Labels::new(language);
    match format {
        OutputFormat::Table => {
            if use_colors {
                Box::new(StyledFormatter::new(labels))
            } else {
                Box::new(StyledFormatter::without_colors(labels))
            }
        }
        OutputFormat::Html => Box::new(HtmlFormatter::new(labels)),
        OutputFormat::Json => Box::new(StructuredFormatter { yaml: false }),
        OutputFormat::Yaml => Box::new(StructuredFormatter { yaml: true }),
        OutputFormat::Csv => Box::new(CsvFormatter::new(true, labels)),
    }
}
