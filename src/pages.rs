//! Pure page renderers for RepoScout.
//!
//! Functions from data to HTML fragments, with no network calls and no
//! mutation. The webview shell wraps these in its chrome; the RPC surface
//! exposes them directly so external hosts can render the same markup.

use crate::types::recommendation::{FetchState, RepositorySummary};
use crate::types::session::UserProfile;

/// Shortens star counts at or above 1000 to a `1.2k` form.
pub fn format_stars(count: u64) -> String {
    if count >= 1000 {
        let k = count as f64 / 1000.0;
        let formatted = format!("{:.1}", k);
        // 12.0k reads better as 12k
        let trimmed = formatted.trim_end_matches(".0");
        format!("{}k", trimmed)
    } else {
        count.to_string()
    }
}

pub(crate) fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Renders one repository card.
fn repository_card(repo: &RepositorySummary, max_topics: usize) -> String {
    let mut html = String::with_capacity(1024);
    html.push_str("<li><div class=\"repo-card\"><div class=\"repo-info\">");
    html.push_str(&format!("<h3>{}</h3>", html_escape(&repo.full_name)));

    if let Some(description) = &repo.description {
        html.push_str(&format!("<p>{}</p>", html_escape(description)));
    }

    html.push_str("<div class=\"repo-details\">");
    if let Some(language) = &repo.language {
        html.push_str(&format!("<span>Language: {}</span>", html_escape(language)));
    }
    html.push_str(&format!(
        "<span>Stars: {}</span><span>Forks: {}</span><span>Open Issues: {}</span><span>Last Updated: {}</span>",
        format_stars(repo.stargazers_count),
        repo.forks_count,
        repo.open_issues_count,
        html_escape(&repo.updated_at),
    ));
    html.push_str("</div>");

    let topics: Vec<&str> = repo
        .topics
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(max_topics)
        .collect();
    if !topics.is_empty() {
        html.push_str("<div class=\"topics-container\"><span>Topics: </span>");
        for topic in topics {
            html.push_str(&format!("<div class=\"topic\">{}</div>", html_escape(topic)));
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");

    if let Some(avatar_url) = &repo.avatar_url {
        html.push_str(&format!(
            "<div class=\"repo-avatar\"><img src=\"{}\" alt=\"Avatar\" /></div>",
            html_escape(avatar_url)
        ));
    }

    html.push_str(&format!(
        "<div class=\"repo-link\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">View Repository</a></div>",
        html_escape(&repo.repo_url)
    ));
    html.push_str("</div></li>");
    html
}

/// Renders an ordered recommendation set as a card list.
///
/// A non-empty sequence renders one card per summary plus a script that
/// scrolls the list into view (a presentation-only side effect); an
/// empty sequence renders a "no recommendations" message.
pub fn recommendation_list_html(items: &[RepositorySummary], max_topics: usize) -> String {
    if items.is_empty() {
        return "<div class=\"reco-container\"><p class=\"empty-message\">No recommendations available. Please generate some first.</p></div>".to_string();
    }

    let mut html = String::with_capacity(items.len() * 1024 + 256);
    html.push_str("<div class=\"reco-container\" id=\"reco-list\"><h2>Recommendations</h2><ul>");
    for repo in items {
        html.push_str(&repository_card(repo, max_topics));
    }
    html.push_str("</ul></div>");
    html.push_str(
        "<script>var el=document.getElementById('reco-list');if(el)el.scrollIntoView({behavior:'smooth'});</script>",
    );
    html
}

/// Renders the previous-recommendations listing from its fetch state.
pub fn history_list_html(ids: &FetchState<Vec<String>>) -> String {
    let mut html = String::with_capacity(512);
    html.push_str("<div class=\"reco-container\"><h2>Previous Recommendations</h2>");
    match ids {
        FetchState::NotFetched | FetchState::Fetching => {
            html.push_str("<p>Loading...</p>");
        }
        FetchState::Fetched(ids) if ids.is_empty() => {
            html.push_str(
                "<p class=\"empty-message\">No recommendations yet. Please generate some first.</p>",
            );
        }
        FetchState::Fetched(ids) => {
            html.push_str("<ul class=\"recommendation-ids\">");
            for id in ids {
                html.push_str(&format!(
                    "<li><button data-id=\"{0}\">{0}</button></li>",
                    html_escape(id)
                ));
            }
            html.push_str("</ul>");
        }
        FetchState::Failed(msg) => {
            html.push_str(&format!(
                "<p class=\"error-message\">Error: {}</p>",
                html_escape(msg)
            ));
        }
    }
    html.push_str("</div>");
    html
}

/// Renders the login page body.
pub fn login_html(login_url: &str) -> String {
    format!(
        concat!(
            "<div class=\"login-container\">",
            "<h1>Search Your Next Open-Source Contribution with Ease!</h1>",
            "<h3>Discover open-source projects to contribute to with personalized recommendations.</h3>",
            "<a class=\"github-login-button\" href=\"{}\">Connect Your GitHub</a>",
            "</div>"
        ),
        html_escape(login_url)
    )
}

/// Renders the navbar greeting for an authenticated user.
pub fn navbar_html(profile: Option<&UserProfile>) -> String {
    match profile {
        Some(profile) => format!(
            "<nav class=\"navbar\"><span class=\"navbar-user\">{}</span><button id=\"logout\">Logout</button></nav>",
            html_escape(&profile.username)
        ),
        None => "<nav class=\"navbar\"></nav>".to_string(),
    }
}
