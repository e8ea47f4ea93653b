use std::{collections::BTreeSet, fmt, path::Path, sync::Arc};

use crate::foundation::{
    core::{Viewport, ViewRect},
    error::{ChoreoError, ChoreoResult},
};

/// Stable identifier of a grid object.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product role of a grid object; selects the forward transition variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectRole {
    /// Ordinary content object opening the standard detail page.
    #[default]
    Content,
    /// The audio object that falls away into the visualizer scene.
    Audio,
    /// Text/about objects that zoom through into the immersive layout.
    Immersive,
    /// The card stack that wipes into the full-panel layout.
    CardStack,
}

/// Image references for the two visual states of an object.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageRefs {
    /// Image shown on the grid at rest.
    #[serde(default)]
    pub closed: Option<String>,
    /// Image shown on hover / when opened.
    #[serde(default)]
    pub open: Option<String>,
}

impl ImageRefs {
    /// Image the transition clone renders: the closed state, else the open one.
    pub fn preferred(&self) -> Option<&str> {
        self.closed.as_deref().or(self.open.as_deref())
    }
}

/// Grid placement: position as viewport fractions, size in logical units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Left edge as a fraction of viewport width.
    pub left: f64,
    /// Top edge as a fraction of viewport height.
    pub top: f64,
    /// Width in logical units.
    pub width: f64,
    /// Height in logical units.
    pub height: f64,
}

impl Placement {
    /// Resolve into viewport coordinates.
    pub fn resolve(&self, viewport: Viewport) -> ViewRect {
        ViewRect::new(
            viewport.width * self.left,
            viewport.height * self.top,
            self.width,
            self.height,
        )
    }
}

/// One catalog entry. Shared read-only with every clone that renders it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentRecord {
    /// Stable object id (grid lookup key).
    pub id: ObjectId,
    /// Label rendered under the image.
    pub label: String,
    /// Detail content opened by this object.
    pub content_key: String,
    /// Image references.
    #[serde(default)]
    pub images: ImageRefs,
    /// Role driving the forward variant.
    #[serde(default)]
    pub role: ObjectRole,
    /// Position on the home grid.
    pub placement: Placement,
}

/// JSON boundary for catalogs.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CatalogDef {
    /// Records in grid order.
    pub objects: Vec<ContentRecord>,
}

/// Validated, ordered, read-only content catalog.
#[derive(Clone, Debug, Default)]
pub struct ContentCatalog {
    records: Vec<Arc<ContentRecord>>,
}

impl ContentCatalog {
    /// Validate a definition and freeze it.
    pub fn from_def(def: CatalogDef) -> ChoreoResult<Self> {
        let mut seen = BTreeSet::new();
        for rec in &def.objects {
            if rec.id.0.trim().is_empty() {
                return Err(ChoreoError::validation("catalog object id must be non-empty"));
            }
            if !seen.insert(rec.id.clone()) {
                return Err(ChoreoError::validation(format!(
                    "duplicate catalog object id '{}'",
                    rec.id
                )));
            }
            if rec.content_key.trim().is_empty() {
                return Err(ChoreoError::validation(format!(
                    "catalog object '{}' has an empty content key",
                    rec.id
                )));
            }
            let p = rec.placement;
            if ![p.left, p.top, p.width, p.height].iter().all(|v| v.is_finite())
                || p.width < 0.0
                || p.height < 0.0
            {
                return Err(ChoreoError::validation(format!(
                    "catalog object '{}' has an invalid placement",
                    rec.id
                )));
            }
        }
        Ok(Self {
            records: def.objects.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse and validate a JSON catalog.
    pub fn from_json_str(s: &str) -> ChoreoResult<Self> {
        let def: CatalogDef =
            serde_json::from_str(s).map_err(|e| ChoreoError::serde(e.to_string()))?;
        Self::from_def(def)
    }

    /// Read, parse and validate a JSON catalog file.
    pub fn from_path(path: &Path) -> ChoreoResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            ChoreoError::Other(anyhow::Error::new(e).context(format!(
                "read catalog '{}'",
                path.display()
            )))
        })?;
        Self::from_json_str(&s)
    }

    /// The product's four-object desk grid.
    pub fn builtin() -> Self {
        fn rec(
            id: &str,
            label: &str,
            key: &str,
            closed: &str,
            open: &str,
            role: ObjectRole,
            left: f64,
        ) -> ContentRecord {
            ContentRecord {
                id: ObjectId::from(id),
                label: label.to_owned(),
                content_key: key.to_owned(),
                images: ImageRefs {
                    closed: Some(closed.to_owned()),
                    open: Some(open.to_owned()),
                },
                role,
                placement: Placement {
                    left,
                    top: 0.5,
                    width: 300.0,
                    height: 300.0,
                },
            }
        }

        let objects = vec![
            rec(
                "obj_headphones",
                "HEADPHONES",
                "music",
                "/images/closed_headphone.png",
                "/images/open_headphone.png",
                ObjectRole::Audio,
                0.2,
            ),
            rec(
                "obj_laptop",
                "LAPTOP",
                "work",
                "/images/closed_laptop.png",
                "/images/open_laptop.png",
                ObjectRole::Immersive,
                0.4,
            ),
            rec(
                "obj_business_cards",
                "BUSINESS CARDS",
                "about",
                "/images/closed_card.png",
                "/images/open_card.png",
                ObjectRole::CardStack,
                0.6,
            ),
            rec(
                "obj_ps4",
                "PS4",
                "music",
                "/images/ps4.png",
                "/images/ps4.png",
                ObjectRole::Content,
                0.8,
            ),
        ];
        Self {
            records: objects.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` when the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in grid order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ContentRecord>> {
        self.records.iter()
    }

    /// Look up a record by object id.
    pub fn by_id(&self, id: &str) -> Option<&Arc<ContentRecord>> {
        self.records.iter().find(|r| r.id.as_str() == id)
    }

    /// First record (in grid order) opening `content_key`.
    pub fn by_content_key(&self, content_key: &str) -> Option<&Arc<ContentRecord>> {
        self.records.iter().find(|r| r.content_key == content_key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/catalog.rs"]
mod tests;
