use super::RenderRequest;

/// Renders the card as a Telegram (legacy) Markdown message.
pub fn render_text(request: &RenderRequest<'_>) -> String {
    let strings = request.locale.strings();
    let mut text = format!("{}\n{}\n\n", strings.brand, request.title);

    for selected in request.matches {
        let fixture = &selected.fixture;
        let score = fixture
            .score_display()
            .map(|score| format!(" ({score})"))
            .unwrap_or_default();

        text.push_str(&format!("⚽️ {}\n", bold_markdown(&fixture.league)));
        text.push_str(&format!("⏰ {}\n", selected.kickoff_for(request.locale)));
        text.push_str(&format!(
            "{} vs {}{}\n\n",
            escape_markdown(&fixture.home_team),
            escape_markdown(&fixture.away_team),
            score
        ));
    }

    text.push_str(strings.promo_footer);
    text
}

fn is_reserved(c: char) -> bool {
    matches!(c, '_' | '*' | '`' | '[')
}

/// Escapes the characters legacy Markdown treats as entity delimiters.
pub fn escape_markdown(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if is_reserved(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wraps `value` in bold. Escapes are not allowed inside an entity, so the
/// span is closed before each reserved character and reopened after it.
pub fn bold_markdown(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    let mut run = String::new();

    for c in value.chars() {
        if is_reserved(c) {
            if !run.is_empty() {
                out.push_str(&format!("*{run}*"));
                run.clear();
            }
            out.push('\\');
            out.push(c);
        } else {
            run.push(c);
        }
    }
    if !run.is_empty() {
        out.push_str(&format!("*{run}*"));
    }
    out
}
