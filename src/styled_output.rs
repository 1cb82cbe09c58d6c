//! Styled terminal output using anstyle.
//!
//! Renders a scan session as a results table, then one coloured card per
//! URL (green for safe, red for suspicious or unreachable), then a short
//! completion footer.

use anstyle::{AnsiColor, Color, Style};
use std::fmt::Write;
use std::io;

use crate::output::{Labels, OutputFormatter};
use crate::record::ScanRecord;
use crate::scanner::{ScanProgress, ScanSession};

/// Widest a table cell may get before it is shortened. URLs are never cut.
const MAX_CELL_WIDTH: usize = 40;

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Style definitions for different UI elements
pub struct Styles {
    pub header: Style,
    pub success: Style,
    pub alert: Style,
    pub warning: Style,
    pub muted: Style,
    pub bold: Style,
    pub url: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            header: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
            success: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
            alert: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
            warning: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            muted: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
            bold: Style::new().bold(),
            url: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue)))
                .underline(),
        }
    }
}

/// Styled formatter for scan sessions
pub struct StyledFormatter {
    styles: Styles,
    use_colors: bool,
    labels: Labels,
}

impl StyledFormatter {
    /// Formatter that colours output when stdout is a terminal
    pub fn new(labels: Labels) -> Self {
        Self {
            styles: Styles::default(),
            use_colors: Self::should_use_colors(),
            labels,
        }
    }

    /// Create a formatter without colors (for non-interactive use)
    pub fn without_colors(labels: Labels) -> Self {
        Self {
            styles: Styles::default(),
            use_colors: false,
            labels,
        }
    }

    /// Formatter with an explicit colour choice
    pub fn with_colors(labels: Labels, use_colors: bool) -> Self {
        Self {
            styles: Styles::default(),
            use_colors,
            labels,
        }
    }

    /// Determine if colors should be used based on environment
    pub fn should_use_colors() -> bool {
        atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
    }

    /// Apply style to text if colors are enabled
    fn styled(&self, text: &str, style: &Style) -> String {
        if self.use_colors {
            format!("{}{}{}", style.render(), text, style.render_reset())
        } else {
            text.to_string()
        }
    }

    fn verdict_style(&self, record: &ScanRecord) -> &Style {
        if record.verdict.is_safe() {
            &self.styles.success
        } else if record.fetch_failed {
            &self.styles.warning
        } else {
            &self.styles.alert
        }
    }

    /// Render the whole session
    pub fn format_session_text(&self, session: &ScanSession) -> Result<String, std::fmt::Error> {
        let mut output = String::new();
        self.write_table(&mut output, session)?;
        self.write_cards(&mut output, session)?;
        self.write_footer(&mut output, session)?;
        Ok(output)
    }

    fn write_table(&self, output: &mut String, session: &ScanSession) -> std::fmt::Result {
        writeln!(output)?;
        writeln!(output, "{}", self.styled(RULE, &self.styles.muted))?;
        writeln!(
            output,
            "  {}",
            self.styled(&format!("🔎 {}", self.labels.title()), &self.styles.header)
        )?;
        writeln!(output, "{}", self.styled(RULE, &self.styles.muted))?;

        let headers = self.labels.headers();
        let rows: Vec<Vec<String>> = session
            .records()
            .iter()
            .map(|r| {
                self.labels
                    .row(r)
                    .into_iter()
                    .enumerate()
                    .map(|(i, c)| if i == 0 { c } else { shorten(&c) })
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(display_width(cell));
            }
        }

        let header_line = join_padded(&headers, &widths);
        writeln!(output, "  {}", self.styled(&header_line, &self.styles.bold))?;
        let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        writeln!(
            output,
            "  {}",
            self.styled(&separator.join("─┼─"), &self.styles.muted)
        )?;

        let verdict_col = headers.len() - 2;
        for (record, row) in session.records().iter().zip(&rows) {
            let plain = join_padded(row, &widths);
            if !self.use_colors {
                writeln!(output, "  {plain}")?;
                continue;
            }
            // Colour only the verdict cell.
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, w))| {
                    let padded = pad(cell, *w);
                    if i == verdict_col {
                        self.styled(&padded, self.verdict_style(record))
                    } else {
                        padded
                    }
                })
                .collect();
            writeln!(output, "  {}", cells.join(" │ ").trim_end())?;
        }

        if session.records().is_empty() {
            writeln!(output, "  {}", self.styled("(no URLs)", &self.styles.muted))?;
        }
        Ok(())
    }

    fn write_cards(&self, output: &mut String, session: &ScanSession) -> std::fmt::Result {
        let [f_url, f_verdict, f_country, f_ip, f_category] = self.labels.card_fields();

        for record in session.records() {
            let style = if record.verdict.is_safe() {
                &self.styles.success
            } else {
                &self.styles.alert
            };
            let marker = if record.verdict.is_safe() { "✅" } else { "⚠️" };

            writeln!(output)?;
            writeln!(
                output,
                "  {} {} {}",
                self.styled("▌", style),
                marker,
                self.styled(&self.labels.verdict(&record.verdict), style)
            )?;
            writeln!(
                output,
                "  {} {f_url}: {}",
                self.styled("├─", &self.styles.muted),
                self.styled(&record.url, &self.styles.url)
            )?;
            writeln!(
                output,
                "  {} {f_verdict}: {}",
                self.styled("├─", &self.styles.muted),
                self.labels.verdict(&record.verdict)
            )?;
            writeln!(
                output,
                "  {} {f_country}: {}",
                self.styled("├─", &self.styles.muted),
                self.labels.value(&record.country)
            )?;
            writeln!(
                output,
                "  {} {f_ip}: {}",
                self.styled("├─", &self.styles.muted),
                self.labels.value(&record.ip)
            )?;
            writeln!(
                output,
                "  {} {f_category}: {}",
                self.styled("└─", &self.styles.muted),
                self.labels.category_column(record)
            )?;
        }
        Ok(())
    }

    fn write_footer(&self, output: &mut String, session: &ScanSession) -> std::fmt::Result {
        let summary = session.summary();
        writeln!(output)?;
        writeln!(output, "{}", self.styled(RULE, &self.styles.muted))?;
        writeln!(
            output,
            "  {} {}",
            self.styled("🎉", &self.styles.success),
            self.styled(self.labels.done(), &self.styles.success)
        )?;
        writeln!(
            output,
            "  {}",
            self.styled(
                &format!(
                    "{} URLs · {} safe · {} suspicious · {} unreachable · {}ms",
                    summary.total,
                    summary.safe,
                    summary.suspicious,
                    summary.unreachable,
                    session.duration_ms()
                ),
                &self.styles.muted
            )
        )?;
        Ok(())
    }

    /// One progress line: `[2/5] https://example.com -> Safe`
    pub fn format_progress(&self, progress: ScanProgress, record: &ScanRecord) -> String {
        format!(
            "{} {} -> {}",
            self.styled(
                &format!("[{}/{}]", progress.completed, progress.total),
                &self.styles.muted
            ),
            record.url,
            self.styled(
                &self.labels.verdict(&record.verdict),
                self.verdict_style(record)
            )
        )
    }
}

impl OutputFormatter for StyledFormatter {
    fn format_session(&self, session: &ScanSession) -> io::Result<String> {
        self.format_session_text(session)
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(fill))
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells.iter().zip(widths).map(|(c, w)| pad(c, *w)).collect();
    padded.join(" │ ").trim_end().to_string()
}

fn shorten(s: &str) -> String {
    if display_width(s) <= MAX_CELL_WIDTH {
        return s.to_string();
    }
    let kept: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
    format!("{kept}…")
}
