//! Raw review form fields, client-side validation and demo presets.

use std::{fmt, str::FromStr};

use shared::{
    domain::{Genre, Language, Rating},
    protocol::ReviewInput,
};

pub const REVIEW_TEXT_MIN_CHARS: usize = 10;
pub const REVIEW_TEXT_MAX_CHARS: usize = 1000;
pub const AUDIENCE_SCORE_MIN: f64 = 0.0;
pub const AUDIENCE_SCORE_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ReviewText,
    Title,
    Rating,
    Genre,
    ReviewerName,
    OriginalLanguage,
    Distributor,
    Director,
    AudienceScore,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::ReviewText,
        FormField::Title,
        FormField::Rating,
        FormField::Genre,
        FormField::ReviewerName,
        FormField::OriginalLanguage,
        FormField::Distributor,
        FormField::Director,
        FormField::AudienceScore,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            FormField::ReviewText => "reviewText",
            FormField::Title => "title",
            FormField::Rating => "rating",
            FormField::Genre => "genre",
            FormField::ReviewerName => "reviewerName",
            FormField::OriginalLanguage => "originalLanguage",
            FormField::Distributor => "distributor",
            FormField::Director => "director",
            FormField::AudienceScore => "audienceScore",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        FormField::ALL
            .into_iter()
            .find(|field| field.wire_name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown field: {raw}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Positive,
    Negative,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Preset::Positive),
            "negative" => Ok(Preset::Negative),
            other => Err(format!("unknown sample: {other} (expected positive or negative)")),
        }
    }
}

/// Field values exactly as typed; nothing is trimmed until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewForm {
    pub review_text: String,
    pub title: String,
    pub rating: String,
    pub genre: String,
    pub reviewer_name: String,
    pub original_language: String,
    pub distributor: String,
    pub director: String,
    pub audience_score: String,
}

impl ReviewForm {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Positive => Self {
                review_text: "This movie was absolutely fantastic! The acting was superb, the plot was engaging, and the special effects were mind-blowing. I couldn't take my eyes off the screen for a single moment. Highly recommended for anyone who loves great cinema!".into(),
                title: "The Matrix".into(),
                rating: "R".into(),
                genre: "Sci-Fi".into(),
                reviewer_name: "MovieLover123".into(),
                original_language: "English".into(),
                distributor: "Warner Bros".into(),
                director: "The Wachowskis".into(),
                audience_score: "87".into(),
            },
            Preset::Negative => Self {
                review_text: "This was one of the worst movies I've ever seen. The plot made no sense, the acting was terrible, and it felt like a complete waste of time. I walked out halfway through and I regret not leaving sooner.".into(),
                title: "Bad Movie".into(),
                rating: "PG-13".into(),
                genre: "Drama".into(),
                reviewer_name: "CriticReviewer".into(),
                original_language: "English".into(),
                distributor: "Universal".into(),
                director: "Unknown Director".into(),
                audience_score: "23".into(),
            },
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ReviewText => &self.review_text,
            FormField::Title => &self.title,
            FormField::Rating => &self.rating,
            FormField::Genre => &self.genre,
            FormField::ReviewerName => &self.reviewer_name,
            FormField::OriginalLanguage => &self.original_language,
            FormField::Distributor => &self.distributor,
            FormField::Director => &self.director,
            FormField::AudienceScore => &self.audience_score,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::ReviewText => &mut self.review_text,
            FormField::Title => &mut self.title,
            FormField::Rating => &mut self.rating,
            FormField::Genre => &mut self.genre,
            FormField::ReviewerName => &mut self.reviewer_name,
            FormField::OriginalLanguage => &mut self.original_language,
            FormField::Distributor => &mut self.distributor,
            FormField::Director => &mut self.director,
            FormField::AudienceScore => &mut self.audience_score,
        };
        *slot = value.into();
    }

    pub fn review_text_chars(&self) -> usize {
        self.review_text.trim().chars().count()
    }

    /// Checks every field and returns the snapshot to submit, or every
    /// field error found.
    pub fn validate(&self) -> Result<ReviewInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let review_text = self.review_text.trim();
        let review_chars = review_text.chars().count();
        if review_chars == 0 {
            errors.push(FieldError::new(
                FormField::ReviewText,
                "Review text is required",
            ));
        } else if review_chars < REVIEW_TEXT_MIN_CHARS {
            errors.push(FieldError::new(
                FormField::ReviewText,
                "Review text must be at least 10 characters long",
            ));
        } else if review_chars > REVIEW_TEXT_MAX_CHARS {
            errors.push(FieldError::new(
                FormField::ReviewText,
                "Review text must be less than 1000 characters",
            ));
        }

        let rating = parse_choice::<Rating>(FormField::Rating, &self.rating, &mut errors);
        let genre = parse_choice::<Genre>(FormField::Genre, &self.genre, &mut errors);
        let original_language = parse_choice::<Language>(
            FormField::OriginalLanguage,
            &self.original_language,
            &mut errors,
        );
        let audience_score = match parse_audience_score(&self.audience_score) {
            Ok(score) => score,
            Err(message) => {
                errors.push(FieldError::new(FormField::AudienceScore, message));
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let input = ReviewInput {
            review_text: review_text.to_string(),
            title: Some(self.title.clone()),
            rating,
            genre,
            reviewer_name: Some(self.reviewer_name.clone()),
            original_language,
            distributor: Some(self.distributor.clone()),
            director: Some(self.director.clone()),
            audience_score,
        };
        Ok(input.normalized())
    }
}

fn parse_choice<T>(field: FormField, raw: &str, errors: &mut Vec<FieldError>) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(FieldError::new(field, capitalize(&err.to_string())));
            None
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_audience_score(raw: &str) -> Result<Option<f64>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let score: f64 = raw
        .parse()
        .ok()
        .filter(|score: &f64| score.is_finite())
        .ok_or("Audience score must be a number")?;
    if !(AUDIENCE_SCORE_MIN..=AUDIENCE_SCORE_MAX).contains(&score) {
        return Err("Audience score must be between 0 and 100");
    }
    let tenths = score * 10.0;
    if (tenths - tenths.round()).abs() > 1e-6 {
        return Err("Audience score must have at most one decimal place");
    }
    Ok(Some(score))
}
