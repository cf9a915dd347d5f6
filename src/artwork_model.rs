//! Data model for artwork inventory records.
//!
//! This module defines the structures held by the registry and exchanged with
//! the presentational layer as JSON. The primary model is [`ArtworkRecord`];
//! [`ArtworkDraft`] is the same record before an id has been assigned, which is
//! what the "add artwork" form edits.
//!
//! JSON field names follow the front end's camelCase convention
//! (`dateCreated`, `dateAcquired`), and an empty date string is read as an
//! unknown date.

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::registry_error::ValidationError;

/// Image used when a record is created without an image URL.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://images.unsplash.com/photo-1579783902614-a3fb3927b6a5?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=350";

/// Calendar date format used on the wire and for display.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shown in place of an absent date.
pub const UNKNOWN_DATE_LABEL: &str = "Unknown";

/// Physical size of a piece, in inches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub depth: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self { width, height, depth }
    }
}

impl Display for Dimensions {
    /// Renders as `36" × 24" × 1.5"`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\" × {}\" × {}\"", self.width, self.height, self.depth)
    }
}

/// Disposition of an artwork within the gallery.
///
/// Serialized in snake_case (`on_display`, `on_consignment`). Deserializing an
/// unrecognised value yields [`ArtworkStatus::Available`], the same fallback
/// the status badge uses for unknown values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtworkStatus {
    #[default]
    Available,
    Sold,
    OnDisplay,
    OnConsignment,
}

impl ArtworkStatus {
    pub const ALL: [ArtworkStatus; 4] = [
        ArtworkStatus::Available,
        ArtworkStatus::Sold,
        ArtworkStatus::OnDisplay,
        ArtworkStatus::OnConsignment,
    ];

    /// Wire value, e.g. `on_display`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtworkStatus::Available => "available",
            ArtworkStatus::Sold => "sold",
            ArtworkStatus::OnDisplay => "on_display",
            ArtworkStatus::OnConsignment => "on_consignment",
        }
    }

    /// Human readable label for badges and select options.
    pub fn label(&self) -> &'static str {
        match self {
            ArtworkStatus::Available => "Available",
            ArtworkStatus::Sold => "Sold",
            ArtworkStatus::OnDisplay => "On Display",
            ArtworkStatus::OnConsignment => "On Consignment",
        }
    }

    /// Parses a wire value, falling back to `Available`.
    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .unwrap_or_default()
    }
}

impl Display for ArtworkStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ArtworkStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().map(ArtworkStatus::from_value).unwrap_or_default())
    }
}

/// Ordered set of tags. Duplicates are never stored and insertion order is
/// kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag` after trimming it.
    ///
    /// Returns `false` when the trimmed tag is empty or already present.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    /// Removes the exact tag, returning whether it was present.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|existing| existing == tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        let mut set = TagSet::new();
        for tag in &tags {
            set.insert(tag);
        }
        set
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.0
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// Anything carrying a tag set: stored records and open drafts alike.
pub trait Taggable {
    fn tags_mut(&mut self) -> &mut TagSet;

    /// Adds a trimmed, non-empty, non-duplicate tag. Returns whether the set
    /// changed.
    fn add_tag(&mut self, tag: &str) -> bool {
        self.tags_mut().insert(tag)
    }

    /// Removes a matching tag. Returns whether the set changed.
    fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags_mut().remove(tag)
    }
}

/// An artwork record as the "add artwork" form holds it: every field but the
/// id.
///
/// The default value is the blank form: empty text, zero dimensions and
/// price, `available` status, unknown dates and no tags.
///
/// ```rust
/// use gallery_inventory_core::artwork_model::{ArtworkDraft, ArtworkStatus};
///
/// let draft: ArtworkDraft = serde_json::from_str(
///     r#"{"title":"Dusk","artist":"R. Ames","price":300,"dateCreated":""}"#,
/// )?;
/// assert_eq!(draft.status, ArtworkStatus::Available);
/// assert!(draft.date_created.is_none());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub status: ArtworkStatus,
    #[serde(default, with = "optional_date")]
    pub date_created: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub date_acquired: Option<NaiveDate>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: TagSet,
}

impl ArtworkDraft {
    /// Required-field and range checks the add/edit forms enforce before
    /// submission.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.artist, self.price, &self.dimensions)
    }
}

impl Taggable for ArtworkDraft {
    fn tags_mut(&mut self) -> &mut TagSet {
        &mut self.tags
    }
}

/// One inventory item held by the registry.
///
/// # Field Constraints
///
/// - **id**: unique within a registry, assigned on creation.
/// - **price**, **dimensions**: non-negative; checked by form validation
///   before a draft is accepted.
/// - **image**: never empty once created; blank input becomes the
///   placeholder URL.
/// - **tags**: no duplicates, insertion order preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkRecord {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub status: ArtworkStatus,
    #[serde(default, with = "optional_date")]
    pub date_created: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub date_acquired: Option<NaiveDate>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: TagSet,
}

impl ArtworkRecord {
    /// Builds a record from a draft. The image is taken as-is; placeholder
    /// substitution is the registry's job.
    pub fn from_draft(id: u64, draft: ArtworkDraft) -> Self {
        Self {
            id,
            title: draft.title,
            artist: draft.artist,
            medium: draft.medium,
            dimensions: draft.dimensions,
            price: draft.price,
            status: draft.status,
            date_created: draft.date_created,
            date_acquired: draft.date_acquired,
            image: draft.image,
            location: draft.location,
            description: draft.description,
            tags: draft.tags,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.artist, self.price, &self.dimensions)
    }

    pub fn date_created_label(&self) -> String {
        date_label(self.date_created)
    }

    pub fn date_acquired_label(&self) -> String {
        date_label(self.date_acquired)
    }
}

impl From<ArtworkRecord> for ArtworkDraft {
    fn from(record: ArtworkRecord) -> Self {
        Self {
            title: record.title,
            artist: record.artist,
            medium: record.medium,
            dimensions: record.dimensions,
            price: record.price,
            status: record.status,
            date_created: record.date_created,
            date_acquired: record.date_acquired,
            image: record.image,
            location: record.location,
            description: record.description,
            tags: record.tags,
        }
    }
}

impl Taggable for ArtworkRecord {
    fn tags_mut(&mut self) -> &mut TagSet {
        &mut self.tags
    }
}

fn validate_fields(
    title: &str,
    artist: &str,
    price: f64,
    dimensions: &Dimensions,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if artist.trim().is_empty() {
        return Err(ValidationError::MissingArtist);
    }
    if !non_negative(price) {
        return Err(ValidationError::InvalidPrice);
    }
    for (name, value) in [
        ("width", dimensions.width),
        ("height", dimensions.height),
        ("depth", dimensions.depth),
    ] {
        if !non_negative(value) {
            return Err(ValidationError::InvalidDimension(name));
        }
    }
    Ok(())
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Formats an optional date for display, `Unknown` when absent.
pub fn date_label(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => UNKNOWN_DATE_LABEL.to_string(),
    }
}

/// The four pieces a fresh gallery starts with when sample data is requested.
pub fn sample_artworks() -> Vec<ArtworkRecord> {
    #[allow(clippy::too_many_arguments)]
    fn sample(
        id: u64,
        title: &str,
        artist: &str,
        medium: &str,
        dimensions: Dimensions,
        price: f64,
        status: ArtworkStatus,
        dates: (&str, &str),
        image: &str,
        location: &str,
        description: &str,
        tags: &[&str],
    ) -> ArtworkRecord {
        ArtworkRecord {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            medium: medium.to_string(),
            dimensions,
            price,
            status,
            date_created: NaiveDate::parse_from_str(dates.0, DATE_FORMAT).ok(),
            date_acquired: NaiveDate::parse_from_str(dates.1, DATE_FORMAT).ok(),
            image: image.to_string(),
            location: location.to_string(),
            description: description.to_string(),
            tags: tags.iter().copied().collect(),
        }
    }

    vec![
        sample(
            1,
            "Sunset Horizon",
            "Elena Cortez",
            "Oil on Canvas",
            Dimensions::new(36.0, 24.0, 1.5),
            1200.0,
            ArtworkStatus::Available,
            ("2023-05-15", "2023-06-20"),
            PLACEHOLDER_IMAGE_URL,
            "Main Gallery",
            "A vibrant sunset landscape with warm orange and purple tones reflecting on the water.",
            &["landscape", "sunset", "contemporary"],
        ),
        sample(
            2,
            "Urban Rhythm",
            "Marcus Chen",
            "Acrylic on Canvas",
            Dimensions::new(48.0, 36.0, 1.0),
            1850.0,
            ArtworkStatus::OnDisplay,
            ("2023-03-10", "2023-04-05"),
            "https://images.unsplash.com/photo-1549887534-1541e9326642?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=350",
            "Front Window",
            "Abstract cityscape capturing the energy and movement of urban life.",
            &["abstract", "cityscape", "modern"],
        ),
        sample(
            3,
            "Serene Forest",
            "Amelia Johnson",
            "Watercolor",
            Dimensions::new(18.0, 24.0, 0.0),
            750.0,
            ArtworkStatus::Sold,
            ("2023-01-22", "2023-02-15"),
            "https://images.unsplash.com/photo-1518717202715-9fa9d099f58a?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=350",
            "Storage",
            "Delicate watercolor painting of a misty forest scene with soft greens and blues.",
            &["landscape", "forest", "watercolor"],
        ),
        sample(
            4,
            "Geometric Harmony",
            "David Park",
            "Mixed Media",
            Dimensions::new(30.0, 30.0, 2.0),
            1400.0,
            ArtworkStatus::OnConsignment,
            ("2023-04-18", "2023-05-10"),
            "https://images.unsplash.com/photo-1541961017774-22349e4a1262?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=350",
            "East Wall",
            "Bold geometric patterns in vibrant colors creating a sense of balance and harmony.",
            &["geometric", "abstract", "contemporary"],
        ),
    ]
}

/// `Option<NaiveDate>` as `"YYYY-MM-DD"`; `null` and `""` both mean absent.
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
