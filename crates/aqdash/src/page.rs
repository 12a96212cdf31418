//! Static HTML page assembling the section charts.

use crate::dashboard::{SectionOutcome, SectionStatus};

const STYLE: &str = "body{font-family:sans-serif;margin:0 auto;max-width:1280px;padding:1.5rem;color:#222}\
h1{font-size:1.8rem}h2{margin-top:2.5rem;border-bottom:1px solid #ddd;padding-bottom:.3rem}\
nav a{margin-right:1rem}img{max-width:100%;height:auto}\
.error{color:#a50f15;background:#fff5f0;border:1px solid #fcbba1;padding:.75rem}\
.meta{color:#666}";

/// Facts about the dataset shown under the page title.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub title: String,
    pub source: String,
    pub rows: usize,
    /// First and last timestamp, already formatted
    pub span: Option<(String, String)>,
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the complete page.
pub fn render_page(context: &PageContext, sections: &[SectionOutcome]) -> String {
    let title = escape_html(&context.title);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(&format!("<style>{STYLE}</style>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str(&format!("<p class=\"meta\">{}</p>\n", meta_line(context)));
    html.push_str(&navigation(sections));

    for outcome in sections {
        html.push_str(&render_section(outcome));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn meta_line(context: &PageContext) -> String {
    let mut meta = format!(
        "Source: {} ({} readings)",
        escape_html(&context.source),
        context.rows
    );
    if let Some((first, last)) = &context.span {
        meta.push_str(&format!(", {} to {}", escape_html(first), escape_html(last)));
    }
    meta
}

fn navigation(sections: &[SectionOutcome]) -> String {
    let links: String = sections
        .iter()
        .map(|outcome| {
            let section = outcome.section;
            format!(
                "<a href=\"#{}\">{}</a>",
                section.anchor(),
                escape_html(section.subheader())
            )
        })
        .collect();
    format!("<nav>{links}</nav>\n")
}

fn render_section(outcome: &SectionOutcome) -> String {
    let section = outcome.section;
    let body = match &outcome.status {
        SectionStatus::Rendered { image } => format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(image),
            escape_html(section.chart_title())
        ),
        SectionStatus::Failed { message } => {
            format!("<p class=\"error\">{}</p>", escape_html(message))
        }
    };
    format!(
        "<section id=\"{}\">\n<h2>{}</h2>\n<p>{}</p>\n{body}\n</section>\n",
        section.anchor(),
        escape_html(section.subheader()),
        escape_html(section.caption())
    )
}
