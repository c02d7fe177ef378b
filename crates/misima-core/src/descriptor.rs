//! Structured cigar attributes carried in a product's free-text description.
//!
//! Content authors write descriptions as comma-separated `Label- Value`
//! segments in a fixed order:
//!
//! ```text
//! Collection- Maria, Format- Robusto, Length- 5in, Diameter- 50, Weight- 20g, Per Box- 20, Strength- Medium
//! ```
//!
//! Labels are not checked; position alone decides the field. The seventh
//! segment (strength) is optional and only shown on detail pages.

use serde::Serialize;
use thiserror::Error;

use crate::blend::{collection_slug, Blend};

const SEGMENT_SEPARATOR: &str = ", ";
const VALUE_DELIMITER: &str = "- ";

/// Field names by segment position.
const FIELDS: [&str; 7] = [
    "collection",
    "format",
    "length",
    "diameter",
    "weight",
    "per_box",
    "strength",
];

const REQUIRED_SEGMENTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    /// Fewer segments than the field needs.
    Missing,
    /// Segment present but has no `"- "` delimiter.
    NoDelimiter,
    /// Segment beyond the last known field.
    Unexpected,
}

/// A description that does not follow the segment convention.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("description segment {index} ({field}) is malformed: {}", reason_text(.reason))]
pub struct MalformedDescriptionError {
    pub index: usize,
    pub field: &'static str,
    pub reason: MalformedReason,
}

fn reason_text(reason: &MalformedReason) -> &'static str {
    match reason {
        MalformedReason::Missing => "segment is missing",
        MalformedReason::NoDelimiter => "no \"- \" delimiter",
        MalformedReason::Unexpected => "unexpected extra segment",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDescriptor {
    pub collection: String,
    pub format: String,
    pub length: String,
    pub diameter: String,
    pub weight: String,
    pub per_box: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
}

impl ProductDescriptor {
    /// Five-character style slug derived from the collection value.
    #[must_use]
    pub fn collection_slug(&self) -> String {
        collection_slug(&self.collection)
    }

    #[must_use]
    pub fn blend(&self) -> Option<Blend> {
        Blend::from_slug(&self.collection_slug())
    }

    /// Display label / value pairs in card order.
    #[must_use]
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            ("Collection", self.collection.as_str()),
            ("Format", self.format.as_str()),
            ("Length", self.length.as_str()),
            ("Diameter", self.diameter.as_str()),
            ("Weight", self.weight.as_str()),
            ("Per Box", self.per_box.as_str()),
        ];
        if let Some(strength) = &self.strength {
            pairs.push(("Cigar Strength", strength.as_str()));
        }
        pairs
    }
}

impl std::str::FromStr for ProductDescriptor {
    type Err = MalformedDescriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_description(s)
    }
}

/// Parses a `Label- Value` description into a [`ProductDescriptor`].
///
/// # Errors
///
/// Returns [`MalformedDescriptionError`] naming the first segment that is
/// missing, lacks the `"- "` delimiter, or lies past the strength field.
pub fn parse_description(description: &str) -> Result<ProductDescriptor, MalformedDescriptionError> {
    let segments: Vec<&str> = description.split(SEGMENT_SEPARATOR).collect();

    if segments.len() > FIELDS.len() {
        return Err(MalformedDescriptionError {
            index: FIELDS.len(),
            field: "extra",
            reason: MalformedReason::Unexpected,
        });
    }

    let mut values: Vec<String> = Vec::with_capacity(segments.len());
    for (index, field) in FIELDS.iter().enumerate() {
        let Some(segment) = segments.get(index) else {
            if index < REQUIRED_SEGMENTS {
                return Err(MalformedDescriptionError {
                    index,
                    field,
                    reason: MalformedReason::Missing,
                });
            }
            break;
        };
        // Only the text between the first and second delimiter is kept.
        let value = segment
            .split(VALUE_DELIMITER)
            .nth(1)
            .ok_or(MalformedDescriptionError {
                index,
                field,
                reason: MalformedReason::NoDelimiter,
            })?;
        values.push(value.to_string());
    }

    let strength = values.get(REQUIRED_SEGMENTS).cloned();
    values.truncate(REQUIRED_SEGMENTS);
    let mut values = values.into_iter();
    let mut next = || values.next().unwrap_or_default();
    Ok(ProductDescriptor {
        collection: next(),
        format: next(),
        length: next(),
        diameter: next(),
        weight: next(),
        per_box: next(),
        strength,
    })
}

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod tests;
