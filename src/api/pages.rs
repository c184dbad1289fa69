//! Server-rendered HTML pages

use super::utils::html_escape;
use crate::inspector::VideoSummary;

const STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:2rem auto;padding:0 1rem}\
table{width:100%;border-collapse:collapse}td,th{padding:.4rem;border-bottom:1px solid #ddd;text-align:left}\
img{max-width:100%}input[type=url]{width:75%}";

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = html_escape(title),
    )
}

/// Search page with the URL form
pub fn render_index() -> String {
    layout(
        "vidgrab",
        r#"<h1>vidgrab</h1>
<form method="post" action="/">
<input type="url" name="url" placeholder="Paste a video link" required>
<button type="submit">Inspect</button>
</form>"#,
    )
}

/// Summary card with one download form per format
pub fn render_summary(video: &VideoSummary) -> String {
    let title = video.title.as_deref().unwrap_or("Untitled video");
    let url = html_escape(&video.original_url);

    let thumbnail = video
        .thumbnail
        .as_deref()
        .map(|src| {
            format!(
                r#"<img src="{}" alt="{}">"#,
                html_escape(src),
                html_escape(title)
            )
        })
        .unwrap_or_default();

    let duration = video
        .duration
        .as_deref()
        .map(|d| format!("<p>Duration: {}</p>", html_escape(d)))
        .unwrap_or_default();

    let rows: String = video
        .formats
        .iter()
        .map(|format| {
            format!(
                r#"<tr><td>{resolution}</td><td>{filesize}</td><td>{ext}</td><td>
<form method="post" action="/download_file">
<input type="hidden" name="url" value="{url}">
<input type="hidden" name="format_id" value="{format_id}">
<button type="submit">Download</button>
</form></td></tr>
"#,
                resolution = html_escape(&format.resolution),
                filesize = html_escape(&format.filesize),
                ext = html_escape(&format.ext),
                format_id = html_escape(&format.format_id),
            )
        })
        .collect();

    let formats = if rows.is_empty() {
        "<p>No downloadable mp4/webm formats were found.</p>".to_string()
    } else {
        format!(
            "<table>\n<tr><th>Resolution</th><th>Size</th><th>Type</th><th></th></tr>\n{rows}</table>"
        )
    };

    let body = format!(
        "<h1>{heading}</h1>\n{thumbnail}\n{duration}\n{formats}\n<p><a href=\"/\">Inspect another link</a></p>",
        heading = html_escape(title),
    );

    layout(title, &body)
}
