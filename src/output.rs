//! Plain-text rendering of resolved repository pages.
//!
//! Every function here is a pure projection of store data into lines of
//! text; nothing in this module fetches or mutates anything.

use gitea_api::models::{Branch, Commit, ContentItem, Repository};
use gitscope::classify::FileKind;
use gitscope::fetch::ApiError;
use gitscope::nav::path_segments;
use gitscope::session::Readme;
use gitscope::store::FileView;
use gitscope::util::format_size;

/// Commit messages longer than this are cut for single-line display.
const MESSAGE_LIMIT: usize = 100;

/// The not-found view shown when the repository itself cannot be fetched.
pub fn not_found(error: &ApiError) -> String {
    let mut out = String::from("Repository Not Found\n");
    out.push_str(
        "The repository you're looking for doesn't exist or you don't have \
         permission to access it.\n",
    );
    out.push_str(&format!("  Code: {}\n", error.code));
    out.push_str(&format!("  Message: {}\n", error.message));
    if let Some(details) = &error.details {
        out.push_str(&format!("  Details: {details}\n"));
    }
    out
}

/// Repository header: full name, badges, description and counts.
pub fn repo_header(repo: &Repository) -> String {
    let mut title = format!("{}/{}", repo.owner.login, repo.name);
    if repo.private {
        title.push_str(" [private]");
    }
    if repo.fork {
        title.push_str(" [fork]");
    }

    let mut out = format!("{title}\n");
    if !repo.description.is_empty() {
        out.push_str(&format!("  {}\n", repo.description));
    }

    let mut counts = format!(
        "  watchers {}  stars {}  forks {}  issues {}",
        repo.watchers_count, repo.stars_count, repo.forks_count, repo.open_issues_count
    );
    if !repo.language.is_empty() {
        counts.push_str(&format!("  language {}", repo.language));
    }
    out.push_str(&counts);
    out.push('\n');
    out
}

/// One line for the most recent commit on the current reference.
pub fn latest_commit(commit: &Commit) -> String {
    format!(
        "{} {} {} ({})\n",
        short_sha(&commit.sha),
        commit.author_name(),
        truncate(commit.summary(), MESSAGE_LIMIT),
        commit.commit.author.date
    )
}

/// Breadcrumb line: repository name, current reference, then the path
/// segments. The root shows as `root`.
pub fn breadcrumbs(repo_name: &str, current_ref: &str, path: &str) -> String {
    let segments = path_segments(path);
    let mut out = format!("{repo_name} on {current_ref}");
    if segments.is_empty() {
        out.push_str(" > root");
    } else {
        for segment in segments {
            out.push_str(" > ");
            out.push_str(segment);
        }
    }
    out.push('\n');
    out
}

/// Directory listing, already sorted by the resolution. Directories carry a
/// trailing slash; file rows end with their humanized size.
pub fn listing(items: &[ContentItem], current_path: &str) -> String {
    let mut out = format!("{} items", items.len());
    if !current_path.is_empty() {
        out.push_str(&format!(" (path: {current_path})"));
    }
    out.push('\n');

    if items.is_empty() {
        out.push_str("  This directory is empty.\n");
        return out;
    }

    let width = items
        .iter()
        .map(|item| display_name(item).len())
        .max()
        .unwrap_or(0);

    for item in items {
        let name = display_name(item);
        if item.kind == gitea_api::models::ContentKind::File {
            out.push_str(&format!("  {name:<width$}  {}\n", format_size(item.size)));
        } else {
            out.push_str(&format!("  {name}\n"));
        }
    }
    out
}

fn display_name(item: &ContentItem) -> String {
    if item.kind.is_dir() {
        format!("{}/", item.name)
    } else {
        item.name.clone()
    }
}

/// The selected file: a header line, then the decoded text for text files
/// or a download pointer for images and binaries.
pub fn file_view(file: &FileView) -> String {
    let mut out = format!(
        "== {} ({}, {}, {}, {}) ==\n",
        file.name,
        format_size(file.size),
        file.encoding,
        file.language,
        file.kind.as_str()
    );

    let link = file.download_url.as_deref().unwrap_or(&file.html_url);
    match file.kind {
        FileKind::Text => {
            out.push_str(&file.content);
            if !file.content.ends_with('\n') {
                out.push('\n');
            }
        }
        FileKind::Image => {
            out.push_str(&format!("Image file, available at: {link}\n"));
        }
        FileKind::Binary => {
            out.push_str(&format!(
                "Binary file ({}), download: {link}\n",
                format_size(file.size)
            ));
        }
    }
    out
}

/// README section under the listing.
pub fn readme(readme: &Readme) -> String {
    let mut out = format!("== {} ==\n", readme.name);
    out.push_str(&readme.body);
    if !readme.body.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// The full branch set, one line per branch.
pub fn branch_list(branches: &[Branch]) -> String {
    let mut out = String::new();
    for branch in branches {
        out.push_str(&format!(
            "{}  {}",
            short_sha(&branch.commit.id),
            branch.name
        ));
        if branch.protected {
            out.push_str("  (protected)");
        }
        out.push('\n');
    }
    out
}

/// Recent commits, most recent first.
pub fn commit_log(commits: &[Commit]) -> String {
    let mut out = String::new();
    for commit in commits {
        out.push_str(&latest_commit(commit));
    }
    out
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Cut `text` at `max` characters, appending `...` when something was cut.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_owned(),
    }
}
