//! Ordered collection of acquired capture sources.

use tracing::debug;

use showflow_capture::{CapturedStream, MediaHandle};
use showflow_ipc::{SourceId, SourceInfo};

/// An acquired capture source.
#[derive(Debug, Clone)]
pub struct Source {
    /// Unique identifier.
    pub id: SourceId,

    /// Display name.
    pub name: String,

    /// Live stream borrowed from the platform.
    pub media: MediaHandle,
}

/// Result of admitting a stream into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Identifier of the new source.
    pub id: SourceId,

    /// True only for the first source the registry ever admitted.
    pub first_ever: bool,
}

/// Owns the gallery, in insertion order.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
    admitted: u64,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a granted stream in a new source and append it.
    ///
    /// The track label becomes the name; without one the source is called
    /// `Source N`, N being the gallery size after insertion.
    pub fn insert(&mut self, stream: CapturedStream) -> Admission {
        let id = SourceId::new();
        let name = stream
            .label()
            .unwrap_or_else(|| format!("Source {}", self.sources.len() + 1));

        debug!(%id, %name, stream_id = stream.handle.stream_id(), "Source added");
        self.sources.push(Source {
            id,
            name,
            media: stream.handle,
        });

        self.admitted += 1;
        Admission {
            id,
            first_ever: self.admitted == 1,
        }
    }

    /// Remove a source and release its stream. `None` if absent.
    pub fn remove(&mut self, id: SourceId) -> Option<Source> {
        let index = self.sources.iter().position(|source| source.id == id)?;
        let source = self.sources.remove(index);
        source.media.release();
        debug!(%id, name = %source.name, "Source removed");
        Some(source)
    }

    /// Remove every source, releasing all streams.
    pub fn clear(&mut self) {
        for source in self.sources.drain(..) {
            source.media.release();
        }
    }

    /// Look up a source.
    pub fn get(&self, id: SourceId) -> Option<&Source> {
        self.sources.iter().find(|source| source.id == id)
    }

    /// Whether a source with this id exists.
    pub fn contains(&self, id: SourceId) -> bool {
        self.get(id).is_some()
    }

    /// Sources in gallery order.
    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the gallery is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Gallery entries with selection flags.
    pub fn infos(&self, preview: Option<SourceId>, program: Option<SourceId>) -> Vec<SourceInfo> {
        self.sources
            .iter()
            .map(|source| SourceInfo {
                id: source.id,
                name: source.name.clone(),
                is_preview: preview == Some(source.id),
                is_live: program == Some(source.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use showflow_capture::{
        AcquireRequest, CaptureConstraints, CapturePlatform, SimulatedOutcome, SimulatedPlatform,
    };

    use super::*;

    fn grant(platform: &SimulatedPlatform, label: Option<&str>) -> CapturedStream {
        platform.script(SimulatedOutcome::Grant {
            label: label.map(str::to_string),
        });
        let (tx, rx) = mpsc::channel();
        platform.request(
            AcquireRequest {
                id: 0,
                constraints: CaptureConstraints::default(),
            },
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        rx.try_recv().unwrap().unwrap()
    }

    #[test]
    fn test_names_use_label_or_position() {
        let platform = SimulatedPlatform::new();
        let mut registry = SourceRegistry::new();

        let a = registry.insert(grant(&platform, None));
        let b = registry.insert(grant(&platform, Some("Window: Slides")));
        let c = registry.insert(grant(&platform, Some("")));

        assert_eq!(registry.get(a.id).unwrap().name, "Source 1");
        assert_eq!(registry.get(b.id).unwrap().name, "Window: Slides");
        assert_eq!(registry.get(c.id).unwrap().name, "Source 3");
    }

    #[test]
    fn test_only_first_admission_is_first_ever() {
        let platform = SimulatedPlatform::new();
        let mut registry = SourceRegistry::new();

        let a = registry.insert(grant(&platform, None));
        assert!(a.first_ever);

        registry.remove(a.id);
        assert!(registry.is_empty());

        let b = registry.insert(grant(&platform, None));
        assert!(!b.first_ever);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let platform = SimulatedPlatform::new();
        let mut registry = SourceRegistry::new();

        let ids: Vec<_> = (0..3)
            .map(|_| registry.insert(grant(&platform, None)).id)
            .collect();
        registry.remove(ids[1]);

        let remaining: Vec<_> = registry.iter().map(|source| source.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_remove_releases_stream() {
        let platform = SimulatedPlatform::new();
        let mut registry = SourceRegistry::new();
        let a = registry.insert(grant(&platform, None));

        assert!(registry.remove(a.id).is_some());
        assert!(platform.tracks()[0].is_stopped());
        assert!(registry.remove(a.id).is_none());
    }

    #[test]
    fn test_infos_flag_selection() {
        let platform = SimulatedPlatform::new();
        let mut registry = SourceRegistry::new();
        let a = registry.insert(grant(&platform, None)).id;
        let b = registry.insert(grant(&platform, None)).id;

        let infos = registry.infos(Some(b), Some(a));
        assert!(infos[0].is_live && !infos[0].is_preview);
        assert!(infos[1].is_preview && !infos[1].is_live);
    }
}
