//! Point markers and their metadata.

use crate::util::NormalizedPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a marker, unique within one annotation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(u64);

impl MarkerId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Display configuration of the equipment a marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerKind {
    #[default]
    Single,
    Dual,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Single => "Single",
            MarkerKind::Dual => "Dual",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(MarkerKind::Single),
            "dual" => Ok(MarkerKind::Dual),
            other => Err(format!("unknown marker kind '{other}'")),
        }
    }
}

/// A single metadata change applied through the marker editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerUpdate {
    Label(String),
    Serial(String),
    Name(String),
    Kind(MarkerKind),
}

/// A labelled point annotation with structured metadata.
///
/// Fields are only mutable through [`AnnotationModel`](super::AnnotationModel),
/// and completion is computed from them on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: MarkerId,
    label: String,
    position: NormalizedPoint,
    kind: MarkerKind,
    serial: String,
    name: String,
    /// Matches a record already held by the store
    persisted: bool,
}

impl Marker {
    pub(crate) fn new(id: MarkerId, label: String, position: NormalizedPoint) -> Self {
        Self {
            id,
            label,
            position,
            kind: MarkerKind::default(),
            serial: String::new(),
            name: String::new(),
            persisted: false,
        }
    }

    pub(crate) fn from_seed(id: MarkerId, seed: MarkerSeed) -> Self {
        Self {
            id,
            label: seed.label,
            position: seed.position,
            kind: seed.kind,
            serial: seed.serial,
            name: seed.name,
            persisted: false,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> NormalizedPoint {
        self.position
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True iff serial, name and label are all non-empty (ignoring surrounding whitespace).
    pub fn is_complete(&self) -> bool {
        !self.serial.trim().is_empty()
            && !self.name.trim().is_empty()
            && !self.label.trim().is_empty()
    }

    /// True while the marker is unchanged since it was loaded from or written to the store.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub(crate) fn set_persisted(&mut self, persisted: bool) {
        self.persisted = persisted;
    }

    pub(crate) fn apply(&mut self, update: MarkerUpdate) {
        self.persisted = false;
        match update {
            MarkerUpdate::Label(label) => self.label = label,
            MarkerUpdate::Serial(serial) => self.serial = serial,
            MarkerUpdate::Name(name) => self.name = name,
            MarkerUpdate::Kind(kind) => self.kind = kind,
        }
    }
}

/// Identity-free marker data, used to restore markers from saved records or batch files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSeed {
    pub label: String,
    pub position: NormalizedPoint,
    #[serde(default)]
    pub kind: MarkerKind,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub name: String,
}

impl From<&Marker> for MarkerSeed {
    fn from(marker: &Marker) -> Self {
        Self {
            label: marker.label.clone(),
            position: marker.position,
            kind: marker.kind,
            serial: marker.serial.clone(),
            name: marker.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> Marker {
        Marker::new(MarkerId::new(1), "1".into(), NormalizedPoint::new(10.0, 20.0))
    }

    #[test]
    fn new_marker_is_incomplete() {
        assert!(!marker().is_complete());
    }

    #[test]
    fn whitespace_only_fields_do_not_count() {
        let mut m = marker();
        m.apply(MarkerUpdate::Serial("S1".into()));
        m.apply(MarkerUpdate::Name("   ".into()));
        assert!(!m.is_complete());
        m.apply(MarkerUpdate::Name("Lobby screen".into()));
        assert!(m.is_complete());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("dual".parse::<MarkerKind>().unwrap(), MarkerKind::Dual);
        assert_eq!(" Single ".parse::<MarkerKind>().unwrap(), MarkerKind::Single);
        assert!("triple".parse::<MarkerKind>().is_err());
    }

    #[test]
    fn seed_round_trips_metadata() {
        let mut m = marker();
        m.apply(MarkerUpdate::Kind(MarkerKind::Dual));
        m.apply(MarkerUpdate::Serial("SN-9".into()));
        let seed = MarkerSeed::from(&m);
        let restored = Marker::from_seed(MarkerId::new(7), seed);
        assert_eq!(restored.kind(), MarkerKind::Dual);
        assert_eq!(restored.serial(), "SN-9");
        assert_eq!(restored.position(), m.position());
        assert_eq!(restored.id(), MarkerId::new(7));
    }
}
