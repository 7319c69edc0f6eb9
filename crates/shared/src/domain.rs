use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Closed set of values whose wire form is a fixed display string.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let raw = raw.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(raw))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: raw.to_string(),
                    })
            }
        }
    };
}

wire_enum!(Rating, "rating", {
    G => "G",
    Pg => "PG",
    Pg13 => "PG-13",
    R => "R",
    Nc17 => "NC-17",
    NotRated => "Not Rated",
});

wire_enum!(Genre, "genre", {
    Action => "Action",
    Adventure => "Adventure",
    Comedy => "Comedy",
    Drama => "Drama",
    Horror => "Horror",
    Romance => "Romance",
    SciFi => "Sci-Fi",
    Thriller => "Thriller",
    Documentary => "Documentary",
    Animation => "Animation",
    Fantasy => "Fantasy",
    Mystery => "Mystery",
});

wire_enum!(Language, "language", {
    English => "English",
    Spanish => "Spanish",
    French => "French",
    German => "German",
    Italian => "Italian",
    Japanese => "Japanese",
    Korean => "Korean",
    Mandarin => "Mandarin",
    Other => "Other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}
