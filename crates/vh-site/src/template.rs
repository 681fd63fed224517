//! HTML page template for rendered help documents.

use std::borrow::Cow;
use std::fmt::Write;

use vh_renderer::{Project, RenderMode, SidebarHeading, escape_html};

/// Stylesheet filename under the mode's static directory.
pub const STYLESHEET: &str = "vimhelp.css";

/// All data needed to render a help page.
pub struct PageData<'a> {
    /// Source filename, e.g. `options.txt`.
    pub filename: &'a str,
    pub project: Project,
    pub mode: RenderMode,
    /// Version label for the footer.
    pub version: Option<&'a str>,
    /// Body fragment produced by the converter.
    pub content: &'a str,
    pub sidebar: &'a [SidebarHeading],
}

/// Render a complete HTML page.
pub fn render_page(page: &PageData<'_>) -> String {
    let mut html = String::with_capacity(page.content.len() + 4096);
    let project = page.project;

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    let _ = writeln!(
        html,
        "<title>{}: {}</title>",
        project.name(),
        escape_html(page.filename)
    );
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{}{STYLESHEET}\">",
        page.mode.static_dir()
    );
    html.push_str("</head>\n<body>\n");

    render_header(&mut html, page);

    html.push_str("<div class=\"layout\">\n");
    render_sidebar(&mut html, page.sidebar);
    html.push_str("<main>\n<pre>\n");
    html.push_str(page.content);
    html.push_str("</pre>\n</main>\n</div>\n");

    render_footer(&mut html, page);

    html.push_str("</body>\n</html>\n");
    html
}

/// Render the title and quick links.
fn render_header(html: &mut String, page: &PageData<'_>) {
    let project = page.project;
    let help = page.mode.help_link();
    html.push_str("<header>\n");
    let _ = writeln!(html, "<h1>{} help files</h1>", project.name());
    let _ = writeln!(
        html,
        "<p>This is an HTML version of the <a href=\"{}\">{}</a> help pages.</p>",
        project.url(),
        project.name()
    );
    html.push_str("<nav>\nQuick links:\n");
    let _ = writeln!(html, "<a href=\"{help}\">help overview</a> &middot;");
    html.push_str("<a href=\"quickref.txt.html\">quick reference</a> &middot;\n");
    html.push_str("<a href=\"usr_toc.txt.html\">user manual toc</a> &middot;\n");
    let _ = writeln!(
        html,
        "<a href=\"{help}#reference_toc\">reference manual toc</a>"
    );
    html.push_str("</nav>\n</header>\n");
}

/// Render the chapter list.
fn render_sidebar(html: &mut String, headings: &[SidebarHeading]) {
    if headings.is_empty() {
        return;
    }
    html.push_str("<aside class=\"sidebar\">\n<ul>\n");
    for heading in headings {
        let _ = writeln!(
            html,
            "<li><a href=\"#{}\">{}</a></li>",
            escape_attr(&heading.anchor),
            escape_html(&heading.text),
        );
    }
    html.push_str("</ul>\n</aside>\n");
}

fn render_footer(html: &mut String, page: &PageData<'_>) {
    let project = page.project;
    let other = project.other();
    html.push_str("<footer>\n");
    match page.version {
        Some(version) => {
            let _ = writeln!(
                html,
                "<p>Generated from the <a href=\"{}\">{} {} documentation sources</a>.</p>",
                project.doc_src_url(),
                project.name(),
                escape_html(version),
            );
        }
        None => {
            let _ = writeln!(
                html,
                "<p>Generated from the <a href=\"{}\">{} documentation sources</a>.</p>",
                project.doc_src_url(),
                project.name(),
            );
        }
    }
    let _ = writeln!(
        html,
        "<p>Help for {} is at <a href=\"https://{}/\">{}</a>.</p>",
        other.contrasted_name(),
        other.vimdoc_site(),
        other.vimdoc_site(),
    );
    html.push_str("</footer>\n");
}

/// Escape a value placed inside a double-quoted attribute.
fn escape_attr(s: &str) -> Cow<'_, str> {
    let escaped = escape_html(s);
    if escaped.contains('"') {
        Cow::Owned(escaped.replace('"', "&quot;"))
    } else {
        escaped
    }
}
