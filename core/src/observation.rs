//! Observations: user-authored field records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{check_version, first_version, visible_by_default};
use crate::tags::check_tags;
use crate::{EntityError, EntityId, EntityRef, EntityResult, LatLon, Tags};

/// What a media attachment holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Photo,
    Video,
    Audio,
}

/// A media attachment, addressed by its source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub source: String,
    #[serde(default)]
    pub kind: MediaKind,
}

impl Media {
    pub fn photo(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind: MediaKind::Photo,
        }
    }

    pub(crate) fn check(&self) -> EntityResult<()> {
        if self.source.trim().is_empty() {
            return Err(EntityError::malformed("media.source"));
        }
        Ok(())
    }
}

fn checked_category(category: String) -> EntityResult<String> {
    if category.trim().is_empty() {
        return Err(EntityError::malformed("category"));
    }
    Ok(category)
}

/// A user-authored record (notes, media, category), optionally anchored to a
/// point and/or a way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    id: EntityId,
    #[serde(default = "first_version")]
    version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    way: Option<EntityId>,
    #[serde(default)]
    notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    media: Vec<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    /// Where the record was captured, independent of any anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<LatLon>,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: Tags,
    #[serde(default = "visible_by_default")]
    visible: bool,
}

impl Observation {
    /// Create an unanchored, empty observation stamped with the current time.
    pub fn new(id: EntityId) -> Self {
        Self::created_at(id, Utc::now())
    }

    /// Create an observation with an explicit creation time.
    pub fn created_at(id: EntityId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            version: first_version(),
            point: None,
            way: None,
            notes: String::new(),
            media: Vec::new(),
            category: None,
            position: None,
            created_at,
            tags: Tags::new(),
            visible: true,
        }
    }

    // Builders used while the observation is still owned by its creator.

    pub fn at_point(mut self, point: EntityId) -> Self {
        self.point = Some(point);
        self
    }

    pub fn on_way(mut self, way: EntityId) -> Self {
        self.way = Some(way);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_media(mut self, media: Media) -> EntityResult<Self> {
        media.check()?;
        self.media.push(media);
        Ok(self)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> EntityResult<Self> {
        self.category = Some(checked_category(category.into())?);
        Ok(self)
    }

    pub fn with_position(mut self, position: LatLon) -> EntityResult<Self> {
        position.check()?;
        self.position = Some(position);
        Ok(self)
    }

    pub fn with_tags(mut self, tags: Tags) -> EntityResult<Self> {
        check_tags(&tags).map_err(EntityError::malformed)?;
        self.tags = tags;
        Ok(self)
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn point(&self) -> Option<&EntityId> {
        self.point.as_ref()
    }

    pub fn way(&self) -> Option<&EntityId> {
        self.way.as_ref()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn media(&self) -> &[Media] {
        &self.media
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn position(&self) -> Option<LatLon> {
        self.position
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Anchors in sequence order: point first, then way.
    pub fn references(&self) -> Vec<EntityRef> {
        self.point
            .iter()
            .cloned()
            .map(EntityRef::point)
            .chain(self.way.iter().cloned().map(EntityRef::way))
            .collect()
    }

    // Edits. Each returns the next version.

    /// A copy with its notes text replaced.
    pub fn annotate(&self, notes: impl Into<String>) -> Self {
        let mut next = self.successor();
        next.notes = notes.into();
        next
    }

    /// A copy with one more media attachment.
    pub fn attach(&self, media: Media) -> EntityResult<Self> {
        media.check()?;
        let mut next = self.successor();
        next.media.push(media);
        Ok(next)
    }

    /// A copy filed under a different category.
    pub fn categorize(&self, category: impl Into<String>) -> EntityResult<Self> {
        let category = checked_category(category.into())?;
        let mut next = self.successor();
        next.category = Some(category);
        Ok(next)
    }

    /// A copy with different anchors.
    pub fn reanchor(&self, point: Option<EntityId>, way: Option<EntityId>) -> Self {
        let mut next = self.successor();
        next.point = point;
        next.way = way;
        next
    }

    /// A copy with its tags replaced.
    pub fn retag(&self, tags: Tags) -> EntityResult<Self> {
        check_tags(&tags).map_err(EntityError::malformed)?;
        let mut next = self.successor();
        next.tags = tags;
        Ok(next)
    }

    /// Check the required fields.
    pub fn validate(&self) -> EntityResult<()> {
        check_version(self.version)?;
        for media in &self.media {
            media.check()?;
        }
        if let Some(category) = &self.category {
            checked_category(category.clone())?;
        }
        if let Some(position) = &self.position {
            position.check()?;
        }
        check_tags(&self.tags).map_err(EntityError::malformed)
    }

    pub(crate) fn with_visibility(&self, visible: bool) -> Self {
        let mut next = self.successor();
        next.visible = visible;
        next
    }

    fn successor(&self) -> Self {
        let mut next = self.clone();
        next.version += 1;
        next
    }
}
