//! Terminal messages for `vh` commands.

use std::fmt::Write;
use std::path::Path;

use console::{Style, Term};
use vh_site::BuildReport;

/// Styled status lines on stderr, kept apart from `vh tags` output on stdout.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print skipped files, then the build summary in green.
    pub(crate) fn build_report(&self, report: &BuildReport, output_dir: &Path) {
        for warning in &report.warnings {
            self.warning(&format!("Skipped {warning}"));
        }
        let summary = summary_line(report, output_dir);
        let _ = self.term.write_line(&self.green.apply_to(summary).to_string());
    }
}

fn summary_line(report: &BuildReport, output_dir: &Path) -> String {
    let pages = if report.pages == 1 { "page" } else { "pages" };
    let mut line = format!(
        "Rendered {} {pages} with {} tags to {}",
        report.pages,
        report.tags,
        output_dir.display()
    );
    if !report.warnings.is_empty() {
        let _ = write!(line, " ({} skipped)", report.warnings.len());
    }
    line
}
