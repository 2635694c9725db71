//! Startup-loaded classifier slots and best-available selection
use crate::classifier::{Classifier, ClassifierError};
use serde::Serialize;
use std::{fmt, path::Path, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModelSlot {
    /// Higher accuracy
    Primary,
    /// Faster
    Secondary,
}

impl fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSlot::Primary => write!(f, "Primary"),
            ModelSlot::Secondary => write!(f, "Secondary"),
        }
    }
}

/// Descriptive metadata of a slot, known whether or not the model loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub last_trained: String,
}

impl ModelInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        last_trained: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            last_trained: last_trained.into(),
        }
    }

    pub fn default_for(slot: ModelSlot) -> Self {
        match slot {
            ModelSlot::Primary => {
                Self::new("VGG16 Transfer Learning", "VGG16-IKARA v1.0", "2025-01-01")
            }
            ModelSlot::Secondary => Self::new(
                "MobileNetV2 Transfer Learning",
                "MobileNetV2-IKARA v1.0",
                "2025-01-01",
            ),
        }
    }
}

pub struct ModelEntry {
    pub slot: ModelSlot,
    pub info: ModelInfo,
    classifier: Option<Arc<dyn Classifier>>,
}

impl ModelEntry {
    pub fn empty(slot: ModelSlot) -> Self {
        Self {
            slot,
            info: ModelInfo::default_for(slot),
            classifier: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    fn loaded(&self) -> Option<LoadedModel<'_>> {
        self.classifier.as_deref().map(|classifier| LoadedModel {
            slot: self.slot,
            info: &self.info,
            classifier,
        })
    }
}

impl fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEntry")
            .field("slot", &self.slot)
            .field("info", &self.info)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Borrowed view of a slot that holds a model
#[derive(Clone, Copy)]
pub struct LoadedModel<'a> {
    pub slot: ModelSlot,
    pub info: &'a ModelInfo,
    pub classifier: &'a dyn Classifier,
}

pub enum Selection<'a> {
    Primary(LoadedModel<'a>),
    Secondary(LoadedModel<'a>),
    Unavailable,
}

impl<'a> Selection<'a> {
    pub fn model(&self) -> Option<LoadedModel<'a>> {
        match self {
            Selection::Primary(model) | Selection::Secondary(model) => Some(*model),
            Selection::Unavailable => None,
        }
    }
}

/// Both classifier slots. Populated once at startup, read-only afterwards.
#[derive(Debug)]
pub struct ModelRegistry {
    primary: ModelEntry,
    secondary: ModelEntry,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl ModelRegistry {
    pub fn empty() -> Self {
        Self {
            primary: ModelEntry::empty(ModelSlot::Primary),
            secondary: ModelEntry::empty(ModelSlot::Secondary),
        }
    }

    pub fn with_model(mut self, slot: ModelSlot, classifier: Arc<dyn Classifier>) -> Self {
        self.entry_mut(slot).classifier = Some(classifier);
        self
    }

    pub fn with_info(mut self, slot: ModelSlot, info: ModelInfo) -> Self {
        self.entry_mut(slot).info = info;
        self
    }

    /// Loads both slots with `loader`. A missing file, a loader error or an output width
    /// that does not match `expected_outputs` leaves the slot empty; the registry is
    /// returned either way.
    pub fn load<F>(
        primary_path: &Path,
        secondary_path: &Path,
        expected_outputs: usize,
        loader: F,
    ) -> Self
    where
        F: Fn(&Path) -> Result<Arc<dyn Classifier>, ClassifierError>,
    {
        let mut registry = Self::empty();
        for (slot, path) in [
            (ModelSlot::Primary, primary_path),
            (ModelSlot::Secondary, secondary_path),
        ] {
            registry.entry_mut(slot).classifier = load_slot(slot, path, expected_outputs, &loader);
        }

        if registry.is_empty() {
            tracing::warn!("No classifier loaded; /predict will fail until the service is restarted with a model");
        }
        registry
    }

    /// Primary if loaded, else secondary, else unavailable
    pub fn select(&self) -> Selection<'_> {
        if let Some(model) = self.primary.loaded() {
            Selection::Primary(model)
        } else if let Some(model) = self.secondary.loaded() {
            Selection::Secondary(model)
        } else {
            Selection::Unavailable
        }
    }

    pub fn entry(&self, slot: ModelSlot) -> &ModelEntry {
        match slot {
            ModelSlot::Primary => &self.primary,
            ModelSlot::Secondary => &self.secondary,
        }
    }

    fn entry_mut(&mut self, slot: ModelSlot) -> &mut ModelEntry {
        match slot {
            ModelSlot::Primary => &mut self.primary,
            ModelSlot::Secondary => &mut self.secondary,
        }
    }

    pub fn is_loaded(&self, slot: ModelSlot) -> bool {
        self.entry(slot).is_loaded()
    }

    pub fn is_empty(&self) -> bool {
        !self.primary.is_loaded() && !self.secondary.is_loaded()
    }
}

fn load_slot<F>(
    slot: ModelSlot,
    path: &Path,
    expected_outputs: usize,
    loader: &F,
) -> Option<Arc<dyn Classifier>>
where
    F: Fn(&Path) -> Result<Arc<dyn Classifier>, ClassifierError>,
{
    if !path.exists() {
        tracing::warn!("{} model not found at {}", slot, path.display());
        return None;
    }

    let loaded = loader(path).and_then(|classifier| match classifier.output_len() {
        Some(actual) if actual != expected_outputs => Err(ClassifierError::OutputMismatch {
            expected: expected_outputs,
            actual,
        }),
        _ => Ok(classifier),
    });

    match loaded {
        Ok(classifier) => {
            tracing::info!("{} model loaded: {}", slot, path.display());
            Some(classifier)
        }
        Err(e @ ClassifierError::OutputMismatch { .. }) => {
            tracing::error!(
                "{} model at {} does not match the label set, refusing to serve it: {}",
                slot,
                path.display(),
                e
            );
            None
        }
        Err(e) => {
            tracing::warn!("Failed to load {} model from {}: {}", slot, path.display(), e);
            None
        }
    }
}
