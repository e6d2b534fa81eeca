//! Owner of all markers and regions for one editing session.

use super::marker::{Marker, MarkerId, MarkerSeed, MarkerUpdate};
use super::region::Region;
use crate::util::NormalizedPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by annotation model operations.
#[derive(Debug, Error, PartialEq)]
pub enum AnnotationError {
    #[error("marker {0} does not exist")]
    UnknownMarker(MarkerId),

    #[error("marker position ({}, {}) is outside the image", .0.x, .0.y)]
    OffImage(NormalizedPoint),
}

/// Owned copy of the annotation state, taken once per save/export operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSnapshot {
    pub markers: Vec<Marker>,
    pub regions: Vec<Region>,
}

impl AnnotationSnapshot {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.regions.is_empty()
    }
}

/// Serializable annotation set, as read from or written to batch files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBatch {
    #[serde(default)]
    pub markers: Vec<MarkerSeed>,
    #[serde(default)]
    pub regions: Vec<Region>,
}

impl From<&AnnotationSnapshot> for AnnotationBatch {
    fn from(snapshot: &AnnotationSnapshot) -> Self {
        Self {
            markers: snapshot.markers.iter().map(MarkerSeed::from).collect(),
            regions: snapshot.regions.clone(),
        }
    }
}

/// Markers and regions in draw order (first = bottom layer, last = top layer).
#[derive(Debug, Default)]
pub struct AnnotationModel {
    markers: Vec<Marker>,
    regions: Vec<Region>,
    next_id: u64,
}

impl AnnotationModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id() == id)
    }

    fn allocate_id(&mut self) -> MarkerId {
        self.next_id += 1;
        MarkerId::new(self.next_id)
    }

    /// Places a new marker; its label defaults to the placement order ("1", "2", ...).
    pub fn add_marker(&mut self, position: NormalizedPoint) -> &Marker {
        let id = self.allocate_id();
        let label = (self.markers.len() + 1).to_string();
        log::debug!(
            "Adding marker {id} '{label}' at ({:.2}%, {:.2}%)",
            position.x,
            position.y
        );
        self.markers.push(Marker::new(id, label, position));
        &self.markers[self.markers.len() - 1]
    }

    /// Re-creates a marker from saved data with a fresh identity.
    ///
    /// Positions outside `[0, 100]` on either axis are rejected.
    pub fn restore_marker(&mut self, seed: MarkerSeed) -> Result<&Marker, AnnotationError> {
        if !seed.position.is_on_image() {
            return Err(AnnotationError::OffImage(seed.position));
        }
        let id = self.allocate_id();
        self.markers.push(Marker::from_seed(id, seed));
        Ok(&self.markers[self.markers.len() - 1])
    }

    fn restore_all<I>(&mut self, seeds: I, persisted: bool) -> usize
    where
        I: IntoIterator<Item = MarkerSeed>,
    {
        let mut restored = 0;
        for seed in seeds {
            let label = seed.label.clone();
            let result = self.restore_marker(seed).map(|_| ());
            match result {
                Ok(()) => {
                    let index = self.markers.len() - 1;
                    self.markers[index].set_persisted(persisted);
                    restored += 1;
                }
                Err(err) => log::warn!("Skipping saved marker '{label}': {err}"),
            }
        }
        restored
    }

    /// Reloads markers from store records, appended in order.
    ///
    /// Restored markers count as persisted until edited, so saving again does
    /// not write them twice. Returns the number of markers restored.
    pub fn restore_records<I>(&mut self, seeds: I) -> usize
    where
        I: IntoIterator<Item = MarkerSeed>,
    {
        let restored = self.restore_all(seeds, true);
        if restored > 0 {
            log::info!("Restored {restored} saved marker(s)");
        }
        restored
    }

    /// Appends every valid marker and region of a batch. Returns `(markers, regions)` added.
    ///
    /// Batch markers are new to the store. Off-image markers and malformed
    /// regions are dropped with a warning.
    pub fn load_batch(&mut self, batch: AnnotationBatch) -> (usize, usize) {
        let markers = self.restore_all(batch.markers, false);
        let before = self.regions.len();
        for region in batch.regions {
            if region.is_valid() {
                self.regions.push(region);
            } else {
                log::warn!("Skipping malformed region {region:?}");
            }
        }
        (markers, self.regions.len() - before)
    }

    /// Flags markers as stored, provided they still match what was saved.
    ///
    /// Returns how many markers were flagged.
    pub fn mark_persisted(&mut self, saved: &[(MarkerId, MarkerSeed)]) -> usize {
        let mut marked = 0;
        for (id, seed) in saved {
            if let Some(marker) = self.markers.iter_mut().find(|m| m.id() == *id) {
                if MarkerSeed::from(&*marker) == *seed {
                    marker.set_persisted(true);
                    marked += 1;
                }
            }
        }
        marked
    }

    /// Applies a partial metadata update; completion follows automatically.
    pub fn update_marker(
        &mut self,
        id: MarkerId,
        update: MarkerUpdate,
    ) -> Result<&Marker, AnnotationError> {
        let marker = self
            .markers
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(AnnotationError::UnknownMarker(id))?;
        marker.apply(update);
        Ok(marker)
    }

    /// Removes exactly one marker. Other markers keep their labels and positions.
    pub fn delete_marker(&mut self, id: MarkerId) -> Option<Marker> {
        let index = self.markers.iter().position(|m| m.id() == id)?;
        log::debug!("Deleting marker {id}");
        Some(self.markers.remove(index))
    }

    /// Appends a region on top of the existing ones.
    pub fn add_region(&mut self, region: Region) {
        self.regions.push(region);
    }

    /// Clears all regions; markers are untouched.
    pub fn reset_regions(&mut self) {
        self.regions.clear();
    }

    /// Copies the current markers and regions.
    pub fn snapshot(&self) -> AnnotationSnapshot {
        AnnotationSnapshot {
            markers: self.markers.clone(),
            regions: self.regions.clone(),
        }
    }
}
