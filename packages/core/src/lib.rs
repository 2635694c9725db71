//! # IKARA Core
//! Prediction pipeline for Indian traditional art style classification:
//! decode an uploaded image, normalize it into a model tensor, run it through the
//! best available classifier and assemble a ranked, described result.

pub mod classifier;
pub mod decode;
pub mod error;
pub mod labels;
pub mod pipeline;
pub mod preprocess;
pub mod registry;
pub mod response;

pub use classifier::{Classifier, ClassifierError};
pub use decode::{Base64Body, ImageRequest};
pub use error::PredictError;
pub use labels::{ART_STYLES, LabelError, LabelRegistry};
pub use pipeline::Pipeline;
pub use preprocess::{INPUT_SIZE, ImageTensor};
pub use registry::{LoadedModel, ModelEntry, ModelInfo, ModelRegistry, ModelSlot, Selection};
pub use response::{LabelConfidence, Prediction};
