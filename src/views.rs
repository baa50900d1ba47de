//! HTML pages. Every piece of user or upstream text goes through
//! [`escape_html`] before it lands in markup.

use crate::{
    types::{TopTracks, Track},
    utils::escape_html,
};

pub const TOP_TRACKS_HEADING: &str = "TOP 10 SPOTIFY TRACKS";
pub const HEATMAP_HEADING: &str = "AUDIO FEATURES HEATMAP";

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = r#"
    body { background: #121212; color: #ffffff; font-family: Raleway, Helvetica, Arial, sans-serif; margin: 0; padding: 2rem; }
    h1 { letter-spacing: 0.1em; text-align: center; }
    nav { text-align: center; margin-bottom: 2rem; }
    a { color: #1db954; }
    ol.tracks { max-width: 40rem; margin: 0 auto; padding: 0; list-style: none; counter-reset: rank; }
    ol.tracks li { counter-increment: rank; display: flex; align-items: center; gap: 1rem; padding: 0.5rem 0; }
    ol.tracks li::before { content: counter(rank); width: 2rem; text-align: right; opacity: 0.6; }
    ol.tracks img, .covers img { width: 64px; height: 64px; object-fit: cover; }
    .artists { opacity: 0.7; font-size: 0.9em; }
    .covers { display: flex; justify-content: center; flex-wrap: wrap; gap: 0.5rem; margin-top: 1rem; }
    .error { max-width: 40rem; margin: 4rem auto; text-align: center; }
"#;

fn page(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
    {head}
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn track_item(track: &Track) -> String {
    let cover = match &track.album_cover_url {
        Some(url) => format!(r#"<img src="{}" alt="">"#, escape_html(url)),
        None => String::new(),
    };

    format!(
        r#"    <li>{cover}<div><div class="name">{name}</div><div class="artists">{artists}</div></div></li>"#,
        name = escape_html(&track.name),
        artists = escape_html(&track.artists.join(", ")),
    )
}

pub fn top_tracks_page(result: &TopTracks) -> String {
    let items: Vec<String> = result.tracks().iter().map(track_item).collect();
    let body = format!(
        r#"<h1>{TOP_TRACKS_HEADING}</h1>
<nav><a href="/heatmap">Audio features heatmap</a></nav>
<ol class="tracks">
{items}
</ol>"#,
        items = items.join("\n"),
    );

    page("Top tracks", "", &body)
}

/// The heatmap page. `heatmap` is trusted markup from
/// [`crate::heatmap::render`].
pub fn heatmap_page(heatmap: &str, covers: &[&str]) -> String {
    let covers: Vec<String> = covers
        .iter()
        .map(|url| format!(r#"<img src="{}" alt="">"#, escape_html(url)))
        .collect();

    let head = format!(r#"<script src="{PLOTLY_JS}" charset="utf-8"></script>"#);
    let body = format!(
        r#"<h1>{HEATMAP_HEADING}</h1>
<nav><a href="/top_tracks">Back to top tracks</a></nav>
{heatmap}
<div class="covers">{covers}</div>"#,
        covers = covers.join(""),
    );

    page("Heatmap", &head, &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<div class="error">
<h1>Something went wrong</h1>
<p>{message}</p>
<p><a href="/">Try again</a></p>
</div>"#,
        message = escape_html(message),
    );

    page("Error", "", &body)
}
