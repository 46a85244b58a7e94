//! HTML form pages
//!
//! `GET /` and `POST /` show the library selector and, once a library is
//! chosen, the item list with match badges and the export form.
//! `POST /export` runs the export and renders the same page with a results
//! table. Problems are shown as messages on the page.

use std::path::Path;

use axum::{
    Form, Router,
    extract::{Query, State},
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{info, warn};

use super::export::resolve_request;
use crate::AppState;
use crate::services::{
    AnnotatedItem, ExportRequest, ExportRequestError, ExportSummary, ItemExportOutcome,
    MatchBucket, MatchReport, annotate_items,
};

#[derive(Debug, Default, Deserialize)]
pub struct LibrarySelection {
    library: Option<String>,
    match_check: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Success,
}

impl MessageKind {
    fn css_class(&self) -> &'static str {
        match self {
            MessageKind::Error => "error",
            MessageKind::Success => "success",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }
}

/// Everything the page template needs
#[derive(Debug, Default)]
pub struct PageView {
    pub libraries: Vec<String>,
    pub selected_library: Option<String>,
    pub items: Vec<AnnotatedItem>,
    pub report: Option<MatchReport>,
    pub match_check: bool,
    pub messages: Vec<Message>,
    pub export_path: String,
    pub media_root: String,
    pub summary: Option<ExportSummary>,
}

async fn index_get(
    State(state): State<AppState>,
    Query(selection): Query<LibrarySelection>,
) -> Html<String> {
    index(state, selection).await
}

async fn index_post(
    State(state): State<AppState>,
    Form(selection): Form<LibrarySelection>,
) -> Html<String> {
    index(state, selection).await
}

async fn index(state: AppState, selection: LibrarySelection) -> Html<String> {
    let match_check = selection.match_check.unwrap_or(state.config.match_check);
    let selected = selection.library.filter(|l| !l.is_empty());
    let export_path = state.config.default_export_path.clone();

    let page = load_page(&state, selected, match_check, export_path, Vec::new()).await;
    Html(render_page(&page))
}

/// Handle the export form (`library`, `export_path`, repeated `items`)
async fn export_form(
    State(state): State<AppState>,
    axum_extra::extract::Form(request): axum_extra::extract::Form<ExportRequest>,
) -> Html<String> {
    let match_check = state.config.match_check;
    let library = Some(request.library.clone()).filter(|l| !l.is_empty());

    let items = match resolve_request(&state, request.clone()).await {
        Ok((_, items)) => items,
        Err(e) => {
            warn!(library = %request.library, error = %e, "Export request rejected");
            // Unknown or missing library falls back to the bare selector
            let selected = match e {
                ExportRequestError::NoLibrary | ExportRequestError::UnknownLibrary(_) => None,
                _ => library,
            };
            let page = load_page(
                &state,
                selected,
                match_check,
                state.config.default_export_path.clone(),
                vec![Message::error(e.to_string())],
            )
            .await;
            return Html(render_page(&page));
        }
    };

    info!(
        library = %request.library,
        items = items.len(),
        export_path = %request.export_path,
        "Export requested via form"
    );

    let export_path = request.export_path.trim().to_string();
    let summary = state
        .exporter
        .export_items(&items, Path::new(&export_path))
        .await;

    let message = if summary.has_errors() {
        Message::error("Export finished with errors. See the results below.")
    } else {
        Message::success("Export finished successfully!")
    };

    let mut page = load_page(&state, library, match_check, export_path, vec![message]).await;
    page.summary = Some(summary);
    Html(render_page(&page))
}

/// Load library names and, for a selected library, its items
async fn load_page(
    state: &AppState,
    selected: Option<String>,
    match_check: bool,
    export_path: String,
    mut messages: Vec<Message>,
) -> PageView {
    let libraries = match state.catalog.read(|c| c.libraries().list_names()).await {
        Ok(names) => names,
        Err(e) => {
            warn!(error = %e, "Cannot load library names");
            Vec::new()
        }
    };
    if libraries.is_empty() {
        messages.push(Message::error(
            "Cannot load library names. Make sure the CSV files exist and are valid.",
        ));
    }

    let mut items = Vec::new();
    if let Some(name) = selected.clone() {
        let lookup = name.clone();
        let loaded = state
            .catalog
            .read(move |c| match c.libraries().id_by_name(&lookup)? {
                Some(id) => c.items().list_by_library(&id).map(Some),
                None => Ok(None),
            })
            .await;
        match loaded {
            Ok(Some(found)) => items = found,
            Ok(None) => messages.push(Message::error(format!(
                "No ID found for library '{}'. Check the name in the CSV file.",
                name
            ))),
            Err(e) => {
                warn!(library = %name, error = %e, "Cannot load library items");
                messages.push(Message::error(e.to_string()));
            }
        }
    }

    let items = annotate_items(items, match_check);
    let report = match_check.then(|| MatchReport::from_items(&items));

    PageView {
        libraries,
        selected_library: selected,
        items,
        report,
        match_check,
        messages,
        export_path,
        media_root: state.config.media_root.display().to_string(),
        summary: None,
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn render_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let lis: String = messages
        .iter()
        .map(|m| {
            format!(
                r#"<li class="flash {}">{}</li>"#,
                m.kind.css_class(),
                escape_html(&m.text)
            )
        })
        .collect();
    format!(r#"<ul class="flash-messages">{}</ul>"#, lis)
}

fn render_library_form(page: &PageView) -> String {
    let options: String = page
        .libraries
        .iter()
        .map(|lib| {
            let selected = if page.selected_library.as_deref() == Some(lib.as_str()) {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                escape_html(lib),
                selected
            )
        })
        .collect();

    let (on, off) = if page.match_check {
        (" selected", "")
    } else {
        ("", " selected")
    };

    format!(
        r#"<form method="post" action="/">
  <div class="form-group">
    <label for="library">Choose a library:</label>
    <select name="library" id="library" onchange="this.form.submit()">
      <option value="">-- choose --</option>
      {options}
    </select>
    <label for="match_check">Folder name check:</label>
    <select name="match_check" id="match_check" onchange="this.form.submit()">
      <option value="true"{on}>on</option>
      <option value="false"{off}>off</option>
    </select>
  </div>
</form>"#
    )
}

fn render_badge(item: &AnnotatedItem) -> String {
    let Some(result) = &item.match_result else {
        return String::new();
    };
    let bucket = result.match_status.bucket();
    let detail = if result.folder_parsed {
        format!(
            "Folder: {} | Parsed: {} - {}",
            result.folder_name,
            result.parsed_authors.join(", "),
            result.parsed_title
        )
    } else {
        format!("Folder: {}", result.folder_name)
    };
    format!(
        r#" <span class="badge badge-{}" title="{}">{}</span>"#,
        bucket.as_str(),
        escape_html(&detail),
        bucket.label()
    )
}

fn render_bucket_toggles(report: &MatchReport) -> String {
    let toggles: String = MatchBucket::ALL
        .iter()
        .map(|bucket| {
            format!(
                r#"<label class="badge badge-{0}"><input type="checkbox" class="bucket-toggle" value="{0}" checked onchange="filterItems()"> {1} ({2})</label>"#,
                bucket.as_str(),
                bucket.label(),
                report.count(*bucket)
            )
        })
        .collect();
    format!(
        r#"<div class="form-group" id="bucket-toggles"><span>Show:</span> {}</div>"#,
        toggles
    )
}

fn render_item(item: &AnnotatedItem) -> String {
    let i = &item.item;
    let bucket = item
        .match_result
        .as_ref()
        .map(|r| r.match_status.bucket().as_str())
        .unwrap_or("");
    let id = escape_html(&i.id);
    format!(
        r#"<div class="item-entry" data-title="{title_lc}" data-author="{author_lc}" data-bucket="{bucket}">
  <input type="checkbox" name="items" value="{id}" id="item-{id}">
  <label for="item-{id}">{title} &ndash; {author} (ID: {id}, Path: {path}){badge}</label>
</div>
"#,
        title_lc = escape_html(&i.title.to_lowercase()),
        author_lc = escape_html(&i.author.to_lowercase()),
        title = escape_html(&i.title),
        author = escape_html(&i.author),
        path = escape_html(&i.relative_path),
        badge = render_badge(item),
    )
}

fn render_export_form(page: &PageView) -> String {
    let Some(library) = &page.selected_library else {
        return String::new();
    };
    if page.items.is_empty() {
        return "<p>The selected library has no items to export, or they could not be loaded.</p>"
            .to_string();
    }

    let toggles = page
        .report
        .as_ref()
        .map(render_bucket_toggles)
        .unwrap_or_default();
    let items: String = page.items.iter().map(render_item).collect();

    format!(
        r#"<form method="post" action="/export">
  <div class="form-group">
    <label for="export_path">Export directory:</label>
    <input type="text" id="export_path" name="export_path" value="{export_path}" placeholder="e.g. /exported_audiobooks">
    <small>Files are copied to <code>[export directory]/[path from CSV]</code>.</small><br>
    <small>Covers and metadata are read from <code>{media_root}/[ID from CSV]/</code>.</small>
  </div>

  <h2>Select items to export ({count} found):</h2>

  <div class="form-group">
    <label for="search-input">Search items:</label>
    <input type="text" id="search-input" placeholder="Type a title or author..." onkeyup="filterItems()">
  </div>
  {toggles}
  <div class="form-group">
    <button type="button" onclick="selectAllItems()">Select all visible</button>
    <button type="button" onclick="deselectAllItems()">Deselect all visible</button>
  </div>

  <div class="item-list" id="item-list">
{items}  </div>
  <input type="hidden" name="library" value="{library}">
  <button type="submit" style="margin-top: 15px;">Export selected</button>
</form>"#,
        export_path = escape_html(&page.export_path),
        media_root = escape_html(&page.media_root),
        count = page.items.len(),
        library = escape_html(library),
    )
}

fn render_outcome(outcome: &ItemExportOutcome) -> String {
    let id = outcome
        .item_id
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "General message".to_string());
    format!(
        r#"<tr>
  <td><strong>{id}</strong></td>
  <td class="status-{}">{}</td>
  <td class="status-{}">{}</td>
  <td class="status-{}">{}</td>
</tr>
"#,
        outcome.metadata.css_class(),
        escape_html(&outcome.metadata.label()),
        outcome.cover.css_class(),
        escape_html(&outcome.cover.label()),
        outcome.overall.as_str(),
        escape_html(&outcome.message),
    )
}

fn render_results(summary: &ExportSummary) -> String {
    let rows: String = summary.outcomes.iter().map(render_outcome).collect();
    format!(
        r#"<h2>Export results:</h2>
<table>
  <thead>
    <tr><th>Item ID</th><th>metadata.json</th><th>cover.jpg</th><th>Overall status</th></tr>
  </thead>
  <tbody>
{rows}  </tbody>
</table>
<div class="summary-box">
  <p>Export summary:</p>
  <p>metadata.json files exported: {}</p>
  <p>cover.jpg files exported: {}</p>
</div>"#,
        summary.metadata_total, summary.cover_total
    )
}

/// Render the full page
pub fn render_page(page: &PageView) -> String {
    let messages = render_messages(&page.messages);
    let library_form = render_library_form(page);
    let export_form = render_export_form(page);
    let results = page
        .summary
        .as_ref()
        .map(render_results)
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Audiobookshelf Exporter</title>
    <style>
        body {{ font-family: sans-serif; margin: 2em; background-color: #f4f4f4; color: #333; }}
        h1, h2 {{ color: #0056b3; }}
        form {{ background-color: #fff; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); margin-bottom: 20px; }}
        select, button, input[type="text"] {{ padding: 10px 15px; border-radius: 5px; border: 1px solid #ccc; font-size: 1em; }}
        button {{ background-color: #007bff; color: white; border: none; cursor: pointer; }}
        button:hover {{ background-color: #0056b3; }}
        .item-list {{ max-height: 400px; overflow-y: auto; border: 1px solid #eee; padding: 10px; background-color: #fdfdfd; border-radius: 5px; margin-top: 15px; }}
        .item-list label {{ margin-bottom: 5px; padding: 3px 0; }}
        .flash-messages {{ list-style-type: none; padding: 0; }}
        .flash {{ padding: 10px; margin-bottom: 15px; border-radius: 5px; }}
        .flash.error {{ background-color: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }}
        .flash.success {{ background-color: #d4edda; color: #155724; border: 1px solid #c3e6cb; }}
        .form-group {{ margin-bottom: 15px; }}
        .form-group input[type="text"] {{ width: calc(100% - 22px); }}
        .badge {{ display: inline-block; padding: 2px 8px; margin-right: 6px; border-radius: 10px; font-size: 0.85em; }}
        .badge-full_match {{ background-color: #d4edda; }}
        .badge-title_only {{ background-color: #fff3cd; }}
        .badge-authors_only {{ background-color: #ffe5b4; }}
        .badge-no_match {{ background-color: #f8d7da; }}
        .badge-parse_error {{ background-color: #e2e3e5; }}
        table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
        th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
        th {{ background-color: #f2f2f2; }}
        tr:nth-child(even) {{ background-color: #f9f9f9; }}
        .status-copied, .status-success {{ color: green; }}
        .status-error {{ color: red; font-weight: bold; }}
        .status-missing {{ color: orange; }}
        .status-exists {{ color: blue; }}
        .status-skipped {{ color: gray; }}
        .status-info {{ color: #0056b3; }}
        .summary-box {{ background-color: #e9f7ef; border: 1px solid #d0e9d9; padding: 15px; margin-top: 20px; border-radius: 8px; color: #155724; }}
        .summary-box p {{ margin: 0 0 5px 0; font-weight: bold; }}
    </style>
</head>
<body>
<h1>Export metadata and covers from Audiobookshelf ID folders</h1>
{messages}
{library_form}
{export_form}
{results}
<script>
function visibleCheckboxes() {{
    return Array.from(document.querySelectorAll('#item-list input[type="checkbox"]'))
        .filter(function(cb) {{ return cb.closest('.item-entry').style.display !== 'none'; }});
}}

function selectAllItems() {{
    visibleCheckboxes().forEach(function(cb) {{ cb.checked = true; }});
}}

function deselectAllItems() {{
    visibleCheckboxes().forEach(function(cb) {{ cb.checked = false; }});
}}

function filterItems() {{
    var input = document.getElementById('search-input');
    var filter = input ? input.value.toLowerCase() : '';
    var enabled = Array.from(document.querySelectorAll('.bucket-toggle'))
        .filter(function(t) {{ return t.checked; }})
        .map(function(t) {{ return t.value; }});
    var hasToggles = document.querySelectorAll('.bucket-toggle').length > 0;

    document.querySelectorAll('.item-entry').forEach(function(entry) {{
        var title = entry.getAttribute('data-title');
        var author = entry.getAttribute('data-author');
        var bucket = entry.getAttribute('data-bucket');
        var textOk = title.includes(filter) || author.includes(filter);
        var bucketOk = !hasToggles || !bucket || enabled.indexOf(bucket) !== -1;
        entry.style.display = textOk && bucketOk ? '' : 'none';
    }});
}}

document.addEventListener('DOMContentLoaded', filterItems);
</script>
</body>
</html>
"#
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index_get).post(index_post))
        .route("/export", post(export_form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LibraryItem;
    use crate::services::{FileCopyStatus, OverallStatus, classify};

    fn annotated(id: &str, path: &str, title: &str, author: &str) -> AnnotatedItem {
        AnnotatedItem {
            item: LibraryItem {
                id: id.to_string(),
                relative_path: path.to_string(),
                title: title.to_string(),
                author: author.to_string(),
            },
            match_result: Some(classify(title, author, Some(path))),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("Zażółć"), "Zażółć");
    }

    #[test]
    fn test_render_page_without_library() {
        let page = PageView {
            libraries: vec!["Audiobooki".into(), "<script>".into()],
            match_check: true,
            messages: vec![Message::error("bad & worse")],
            ..Default::default()
        };
        let html = render_page(&page);
        assert!(html.contains(r#"<option value="Audiobooki">Audiobooki</option>"#));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"<li class="flash error">bad &amp; worse</li>"#));
        assert!(!html.contains(r#"action="/export""#));
    }

    #[test]
    fn test_render_page_with_items_and_badges() {
        let items = vec![
            annotated("it1", "Jan Kowalski - Wielka Podróż (2019)", "Wielka Podróż", "Jan Kowalski"),
            annotated("it2", "bez separatora", "Tytuł", "Autor"),
        ];
        let report = MatchReport::from_items(&items);
        let page = PageView {
            libraries: vec!["Audiobooki".into()],
            selected_library: Some("Audiobooki".into()),
            items,
            report: Some(report),
            match_check: true,
            export_path: "/out".into(),
            media_root: "/media".into(),
            ..Default::default()
        };
        let html = render_page(&page);

        assert!(html.contains(r#"<option value="Audiobooki" selected>"#));
        assert!(html.contains(r#"name="items" value="it1""#));
        assert!(html.contains(r#"data-bucket="full_match""#));
        assert!(html.contains(r#"data-bucket="parse_error""#));
        assert!(html.contains("Full match (1)"));
        assert!(html.contains("Parse error (1)"));
        assert!(html.contains("No match (0)"));
        assert!(html.contains(r#"value="/out""#));
        assert!(html.contains("<code>/media/[ID from CSV]/</code>"));
        assert!(html.contains(r#"<input type="hidden" name="library" value="Audiobooki">"#));
    }

    #[test]
    fn test_render_page_selected_library_without_items() {
        let page = PageView {
            libraries: vec!["Puste".into()],
            selected_library: Some("Puste".into()),
            ..Default::default()
        };
        let html = render_page(&page);
        assert!(html.contains("no items to export"));
        assert!(!html.contains(r#"action="/export""#));
    }

    #[test]
    fn test_render_results_table() {
        let summary = ExportSummary {
            outcomes: vec![
                ItemExportOutcome {
                    item_id: None,
                    metadata: FileCopyStatus::NotApplicable,
                    cover: FileCopyStatus::NotApplicable,
                    overall: OverallStatus::Info,
                    message: "Created export directory '/out'".into(),
                },
                ItemExportOutcome {
                    item_id: Some("it1".into()),
                    metadata: FileCopyStatus::Copied,
                    cover: FileCopyStatus::Error("denied".into()),
                    overall: OverallStatus::Error,
                    message: "Errors occurred".into(),
                },
            ],
            metadata_total: 1,
            cover_total: 0,
        };
        let html = render_results(&summary);
        assert!(html.contains("<strong>General message</strong>"));
        assert!(html.contains(r#"<td class="status-copied">Copied</td>"#));
        assert!(html.contains(r#"<td class="status-error">Error: denied</td>"#));
        assert!(html.contains(r#"<td class="status-info">Created export directory &#39;/out&#39;</td>"#));
        assert!(html.contains("metadata.json files exported: 1"));
        assert!(html.contains("cover.jpg files exported: 0"));
    }
}
