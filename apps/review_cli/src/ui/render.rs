use crate::controller::form::{FieldError, FormField, ReviewForm, REVIEW_TEXT_MAX_CHARS};

use super::presenter::{HealthIndicator, ModelAgreement, Panel, ResultView};

pub fn render_panel(panel: &Panel<'_>) -> String {
    match panel {
        Panel::Ready => "Ready for Analysis\n\
             Fill in the review details and run `submit` to get started.\n"
            .to_string(),
        Panel::Loading => "Analyzing...\n".to_string(),
        Panel::Error(message) => format!("Prediction Error\n  {message}\n"),
        Panel::Result(view) => render_result(view),
    }
}

fn render_result(view: &ResultView<'_>) -> String {
    let mut out = format!(
        "Prediction Result: {} Sentiment [{}]\n  Based on analysis from {} models\n",
        capitalized(view.overall.as_str()),
        view.overall_tone.as_str(),
        view.rows.len()
    );

    out.push_str("\nModel Analysis Breakdown\n");
    for row in &view.rows {
        out.push_str(&format!(
            "  {:<24} {:<8} [{}]  confidence {:>6} {} [{}]\n",
            row.model_name,
            row.sentiment.as_str(),
            row.sentiment_tone.as_str(),
            row.confidence_percent(),
            row.level.label(),
            row.level.tone().as_str()
        ));
    }

    out.push_str("\nInput Summary\n");
    out.push_str(&format!("  Review Text: \"{}\"\n", view.summary.review_text));
    if let Some(title) = view.summary.title {
        out.push_str(&format!("  Movie: {title}\n"));
    }
    if let Some(genre) = view.summary.genre {
        out.push_str(&format!("  Genre: {genre}\n"));
    }
    if let Some(score) = view.summary.audience_score {
        out.push_str(&format!("  Audience Score: {score}/100\n"));
    }

    if let Some(agreement) = &view.agreement {
        out.push_str(&render_agreement(agreement));
    }
    out
}

fn render_agreement(agreement: &ModelAgreement) -> String {
    format!(
        "\nModel Agreement\n  Positive: {}  Negative: {}\n  Agreement Level: {} [{}]\n",
        agreement.positive,
        agreement.negative,
        agreement.percent(),
        agreement.tone().as_str()
    )
}

pub fn render_health(indicator: &HealthIndicator) -> String {
    format!("{} [{}]", indicator.text, indicator.tone.as_str())
}

pub fn render_form(form: &ReviewForm, errors: &[FieldError]) -> String {
    let mut out = String::new();
    for field in FormField::ALL {
        let value = form.get(field);
        let shown = if value.is_empty() { "-" } else { value };
        out.push_str(&format!("  {:<17} {shown}\n", field.wire_name()));
        if field == FormField::ReviewText {
            out.push_str(&format!(
                "  {:<17} {}/{REVIEW_TEXT_MAX_CHARS}\n",
                "",
                form.review_text_chars()
            ));
        }
        for err in errors.iter().filter(|err| err.field == field) {
            out.push_str(&format!("  {:<17} ! {}\n", "", err.message));
        }
    }
    out
}

pub fn render_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|err| format!("  ! {err}\n"))
        .collect()
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
