use crate::dataset::Snapshot;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; }
nav { background-color: #2b2d42; color: white; padding: 1rem 1.5rem; }
nav a { color: white; margin-right: 1rem; }
main { padding: 1rem 1.5rem; }
.section { background-color: #edf2f4; padding: 1rem 1.5rem; border-radius: 12px; margin-bottom: 1.5rem; }
footer { text-align: center; color: gray; font-size: 0.85em; margin-top: 2rem; }
"#;

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// The landing page: what the recommender does and how.
pub fn render_about(title: &str, snapshot: &Snapshot) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<nav>
<a href="/">About</a>
<a href="/api/actors">Actors</a>
<a href="/api/stats/films">Films</a>
<a href="/api/stats/actors">Actor statistics</a>
</nav>
<main>
<h1>{title}</h1>
<div class="section">
<p>Films are recommended with content-based filtering over actors' filmographies.</p>
<ul>
<li>Every actor is represented by the titles of the films they played in.</li>
<li>A TF-IDF vectorizer turns each filmography into a term vector.</li>
<li>Cosine similarity between those vectors finds actors with similar filmographies.</li>
<li>Films of the most similar actors, best rated first, are the recommendations.</li>
</ul>
<p>Dataset: {rows} rows, {actors} actors.</p>
<p>Try <code>/api/recommend/&lt;actor&gt;</code> to get started.</p>
</div>
</main>
<footer><hr>{title}</footer>
</body>
</html>
"#,
        rows = snapshot.dataset.len(),
        actors = snapshot.model.len(),
    )
}
