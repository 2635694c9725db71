//! Per-request prediction flow: select → decode → preprocess → infer → assemble.
use crate::{
    decode::ImageRequest,
    error::PredictError,
    labels::LabelRegistry,
    preprocess::preprocess,
    registry::{ModelRegistry, Selection},
    response::{Prediction, assemble},
};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Borrowing orchestrator over the shared, read-only registries
pub struct Pipeline<'a> {
    models: &'a ModelRegistry,
    labels: &'a LabelRegistry,
}

impl<'a> Pipeline<'a> {
    pub fn new(models: &'a ModelRegistry, labels: &'a LabelRegistry) -> Self {
        Self { models, labels }
    }

    /// Runs one request to completion. Every failure is terminal; nothing is retried.
    pub fn run(&self, request: ImageRequest) -> Result<Prediction, PredictError> {
        let model = match self.models.select() {
            Selection::Primary(model) | Selection::Secondary(model) => model,
            Selection::Unavailable => return Err(PredictError::NoModelAvailable),
        };

        let bytes = request.decode()?;
        let tensor = preprocess(&bytes)?;

        let scores = catch_unwind(AssertUnwindSafe(|| model.classifier.predict(&tensor)))
            .map_err(|panic| PredictError::InferenceError(panic_message(panic)))?
            .map_err(|e| PredictError::InferenceError(e.to_string()))?;

        if scores.len() != self.labels.len() {
            return Err(PredictError::InferenceError(format!(
                "model returned {} scores for {} labels",
                scores.len(),
                self.labels.len()
            )));
        }

        let prediction = assemble(&scores, &model, self.labels);
        tracing::debug!(
            label = %prediction.predicted_label,
            confidence = prediction.confidence,
            model = %prediction.model_used,
            "prediction assembled"
        );
        Ok(prediction)
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "classifier panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classifier::{Classifier, ClassifierError},
        preprocess::ImageTensor,
        registry::ModelSlot,
    };
    use base64::{Engine, engine::general_purpose::STANDARD};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use serde_json::json;
    use std::{
        io::Cursor,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    struct Scripted {
        scores: Vec<f32>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(scores: Vec<f32>) -> Arc<Self> {
            Arc::new(Self {
                scores,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Classifier for Scripted {
        fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>, ClassifierError> {
            assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scores.clone())
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn predict(&self, _tensor: &ImageTensor) -> Result<Vec<f32>, ClassifierError> {
            Err(ClassifierError::Inference("session poisoned".into()))
        }
    }

    struct Panicking;

    impl Classifier for Panicking {
        fn predict(&self, _tensor: &ImageTensor) -> Result<Vec<f32>, ClassifierError> {
            panic!("index out of bounds in kernel")
        }
    }

    fn red_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(300, 300, Rgb([255, 0, 0]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn one_hot(index: usize) -> Vec<f32> {
        let mut scores = vec![0.0; 8];
        scores[index] = 1.0;
        scores
    }

    #[test]
    fn upload_end_to_end() {
        let stub = Scripted::new(one_hot(0));
        let models = ModelRegistry::empty().with_model(ModelSlot::Primary, stub.clone());
        let labels = LabelRegistry::default();

        let prediction = Pipeline::new(&models, &labels)
            .run(ImageRequest::upload(red_png()))
            .unwrap();

        assert_eq!(prediction.predicted_label, "Gond");
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(prediction.distribution[0].label, "Gond");
        assert_eq!(prediction.model_used, ModelSlot::Primary);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn base64_data_url_end_to_end() {
        let models = ModelRegistry::empty().with_model(ModelSlot::Secondary, Scripted::new(one_hot(4)));
        let labels = LabelRegistry::default();
        let encoded = format!("data:image/png;base64,{}", STANDARD.encode(red_png()));

        let prediction = Pipeline::new(&models, &labels)
            .run(ImageRequest::json(&json!({ "imageBase64": encoded })))
            .unwrap();

        assert_eq!(prediction.predicted_label, "Madhubani");
        assert_eq!(prediction.model_used, ModelSlot::Secondary);
    }

    #[test]
    fn model_is_checked_before_input() {
        let models = ModelRegistry::empty();
        let labels = LabelRegistry::default();
        let err = Pipeline::new(&models, &labels)
            .run(ImageRequest::default())
            .unwrap_err();
        assert!(matches!(err, PredictError::NoModelAvailable));
    }

    #[test]
    fn stage_failures_map_to_their_kind() {
        let stub = Scripted::new(one_hot(0));
        let models = ModelRegistry::empty().with_model(ModelSlot::Primary, stub.clone());
        let labels = LabelRegistry::default();
        let pipeline = Pipeline::new(&models, &labels);

        let err = pipeline.run(ImageRequest::json(&json!({}))).unwrap_err();
        assert!(matches!(err, PredictError::NoImageProvided));

        let err = pipeline
            .run(ImageRequest::json(&json!({ "image": "%%%" })))
            .unwrap_err();
        assert!(matches!(err, PredictError::DecodeError(_)));

        let err = pipeline
            .run(ImageRequest::upload(b"GIF89a but not really".to_vec()))
            .unwrap_err();
        assert!(matches!(err, PredictError::UnreadableImage(_)));

        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn classifier_errors_become_inference_errors() {
        let labels = LabelRegistry::default();

        let models = ModelRegistry::empty().with_model(ModelSlot::Primary, Arc::new(Failing));
        let err = Pipeline::new(&models, &labels)
            .run(ImageRequest::upload(red_png()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Inference failed: Inference error: session poisoned"
        );

        let models = ModelRegistry::empty().with_model(ModelSlot::Primary, Arc::new(Panicking));
        let err = Pipeline::new(&models, &labels)
            .run(ImageRequest::upload(red_png()))
            .unwrap_err();
        assert!(matches!(err, PredictError::InferenceError(msg) if msg.contains("kernel")));
    }

    #[test]
    fn wrong_score_count_is_rejected() {
        let models =
            ModelRegistry::empty().with_model(ModelSlot::Primary, Scripted::new(vec![1.0; 1000]));
        let labels = LabelRegistry::default();
        let err = Pipeline::new(&models, &labels)
            .run(ImageRequest::upload(red_png()))
            .unwrap_err();
        assert!(matches!(err, PredictError::InferenceError(_)));
    }
}
