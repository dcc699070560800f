use crate::batch::BatchOutcome;
use crate::match_key::format_match_label;
use crate::summary::ValidationSummary;
use crate::validation::{
    event_rescout_worklist, Confidence, MatchValidationResult, RescoutTarget, Severity,
    ValidationStatus,
};
use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

/// Everything one `validate` run reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub event_key: String,
    pub generated_at: DateTime<Utc>,
    pub cancelled: bool,
    pub summary: ValidationSummary,
    pub results: Vec<MatchValidationResult>,
    pub rescout: Vec<RescoutTarget>,
}

impl ValidationReport {
    pub fn from_outcome(event_key: &str, outcome: BatchOutcome, generated_at: DateTime<Utc>) -> Self {
        let rescout = event_rescout_worklist(&outcome.results);
        Self {
            event_key: event_key.to_string(),
            generated_at,
            cancelled: outcome.cancelled,
            summary: outcome.summary,
            results: outcome.results,
            rescout,
        }
    }

    /// Results that need a human to look at them, in the report's order.
    pub fn needing_review(&self) -> impl Iterator<Item = &MatchValidationResult> {
        self.results.iter().filter(|r| r.flagged_for_review)
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &ValidationReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(&report.summary)?;
        self.write_matches(report)?;
        self.write_rescout(&report.rescout)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Scouting Validation Report: {}", report.event_key)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        if report.cancelled {
            writeln!(self.writer)?;
            writeln!(self.writer, "> Validation was cancelled before every match finished.")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, summary: &ValidationSummary) -> anyhow::Result<()> {
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;

        let rows = [
            ("Matches", summary.total_matches.to_string()),
            ("Validated", summary.validated_matches.to_string()),
            ("Passed", summary.passed_matches.to_string()),
            ("Flagged", summary.flagged_matches.to_string()),
            ("Failed", summary.failed_matches.to_string()),
            ("No official data", summary.no_tba_data_matches.to_string()),
            ("Pending", summary.pending_matches.to_string()),
            ("Not scouted", summary.no_scouting_matches.to_string()),
            (
                "Discrepancies (critical / warning / minor)",
                format!(
                    "{} / {} / {}",
                    summary.critical_discrepancies,
                    summary.warning_discrepancies,
                    summary.minor_discrepancies
                ),
            ),
            ("Average confidence", confidence_text(summary.average_confidence)),
        ];
        for (metric, value) in rows {
            writeln!(self.writer, "| {metric} | {value} |")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_matches(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        if report.results.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Matches")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Match | Status | Confidence | Critical | Warning | Minor |")?;
        writeln!(self.writer, "|-------|--------|------------|----------|---------|-------|")?;
        for result in &report.results {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} |",
                format_match_label(&result.match_key),
                result.status,
                result.confidence,
                result.critical_discrepancies,
                result.warning_discrepancies,
                result.minor_discrepancies()
            )?;
        }
        writeln!(self.writer)?;

        for result in report.needing_review() {
            writeln!(self.writer, "### {}", format_match_label(&result.match_key))?;
            writeln!(self.writer)?;
            for discrepancy in result.discrepancies() {
                writeln!(self.writer, "- **{}** {}", discrepancy.severity, discrepancy.message)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_rescout(&mut self, targets: &[RescoutTarget]) -> anyhow::Result<()> {
        if targets.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Re-scout")?;
        writeln!(self.writer)?;
        for target in targets {
            writeln!(
                self.writer,
                "- {} team {} ({}): {}",
                format_match_label(&target.match_key),
                target.team_number,
                target.alliance,
                target.reasons.join(", ")
            )?;
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        self.print_header(report)?;
        self.print_summary(&report.summary)?;
        self.print_review_list(report)?;
        self.print_rescout(&report.rescout)?;
        self.print_pass_fail_status(&report.summary)?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn print_header(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        let divider = "═".repeat(44);
        writeln!(self.writer, "{}", divider.blue())?;
        writeln!(
            self.writer,
            "    {} {}",
            "Scouting Validation:".bold(),
            report.event_key.bold()
        )?;
        writeln!(self.writer, "{}", divider.blue())?;
        if report.cancelled {
            writeln!(self.writer, "{}", "Cancelled: results are partial".yellow())?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_summary(&mut self, summary: &ValidationSummary) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Summary:".bold())?;
        writeln!(
            self.writer,
            "  Matches: {} ({} validated, {} pending, {} not scouted)",
            summary.total_matches,
            summary.validated_matches,
            summary.pending_matches,
            summary.no_scouting_matches
        )?;
        writeln!(
            self.writer,
            "  Passed: {}  Flagged: {}  Failed: {}  No official data: {}",
            summary.passed_matches.to_string().green(),
            summary.flagged_matches.to_string().yellow(),
            summary.failed_matches.to_string().red(),
            summary.no_tba_data_matches
        )?;
        writeln!(
            self.writer,
            "  Discrepancies: {} critical, {} warning, {} minor",
            summary.critical_discrepancies.to_string().red(),
            summary.warning_discrepancies.to_string().yellow(),
            summary.minor_discrepancies
        )?;
        writeln!(
            self.writer,
            "  Average confidence: {}",
            colored_confidence(summary.average_confidence)
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_review_list(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        let flagged: Vec<_> = report.needing_review().collect();
        if flagged.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{} ({}):", "Needs Review".bold(), flagged.len())?;
        for result in flagged {
            writeln!(
                self.writer,
                "  {} {}",
                format!("{:<18}", format_match_label(&result.match_key)).bold(),
                colored_status(result.status)
            )?;
            for discrepancy in result.discrepancies() {
                writeln!(
                    self.writer,
                    "    - [{}] {}",
                    colored_severity(discrepancy.severity),
                    discrepancy.message
                )?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_rescout(&mut self, targets: &[RescoutTarget]) -> anyhow::Result<()> {
        if targets.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{} ({} teams):", "Re-scout".red().bold(), targets.len())?;
        for target in targets {
            writeln!(
                self.writer,
                "  {} team {} ({}) - {}",
                format_match_label(&target.match_key),
                target.team_number,
                target.alliance,
                target.reasons.join(", ")
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_pass_fail_status(&mut self, summary: &ValidationSummary) -> anyhow::Result<()> {
        let (symbol, status, message) = if summary.failed_matches == 0 {
            ("✓".green(), "PASS".green().bold(), "no critical discrepancies")
        } else {
            ("✗".red(), "FAIL".red().bold(), "some matches need re-scouting")
        };
        writeln!(self.writer, "{symbol} {status} ({message})")?;
        Ok(())
    }
}

fn confidence_text(confidence: Option<Confidence>) -> String {
    confidence.map_or_else(|| "n/a".to_string(), |c| c.to_string())
}

fn colored_confidence(confidence: Option<Confidence>) -> ColoredString {
    let text = confidence_text(confidence);
    match confidence {
        Some(Confidence::High) => text.green(),
        Some(Confidence::Medium) => text.yellow(),
        Some(Confidence::Low) => text.red(),
        None => text.dimmed(),
    }
}

fn colored_status(status: ValidationStatus) -> ColoredString {
    match status {
        ValidationStatus::Passed => status.as_str().green(),
        ValidationStatus::Flagged => status.as_str().yellow(),
        ValidationStatus::Failed => status.as_str().red().bold(),
        ValidationStatus::NoTbaData | ValidationStatus::Pending => status.as_str().dimmed(),
    }
}

fn colored_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => severity.as_str().red().bold(),
        Severity::Warning => severity.as_str().yellow(),
        Severity::Minor | Severity::None => severity.as_str().normal(),
    }
}

pub fn create_writer(format: OutputFormat, destination: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(destination)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination)),
    }
}
