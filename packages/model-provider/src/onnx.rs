//! ONNX Runtime classifier
use ikara::{Classifier, ClassifierError, ImageTensor};
use ort::{inputs, session::Session, value::Value};
use parking_lot::Mutex;
use std::path::Path;

/// An ONNX session taking a `[1, 224, 224, 3]` float input and producing one score per class.
pub struct OnnxClassifier {
    /// `Session::run` needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    output_len: Option<usize>,
}

impl OnnxClassifier {
    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|e| ClassifierError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_session(session)
    }

    pub fn from_session(session: Session) -> Result<Self, ClassifierError> {
        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| ClassifierError::Load("model declares no inputs".to_string()))?;

        // last dimension of the first output; dynamic (-1) dims are unknown
        let output_len = session
            .outputs
            .first()
            .and_then(|output| output.output_type.tensor_shape())
            .and_then(|dims| dims.last().copied())
            .filter(|dim| *dim > 0)
            .map(|dim| dim as usize);

        tracing::debug!(
            "ONNX classifier input '{}', output width {:?}",
            input_name,
            output_len
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_len,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>, ClassifierError> {
        let value =
            Value::from_array(tensor.clone()).map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(inputs![self.input_name.as_str() => value])
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let (_, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| ClassifierError::Inference("model produced no outputs".to_string()))?;
        let scores = output
            .try_extract_array::<f32>()
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        Ok(scores.iter().copied().collect())
    }

    fn output_len(&self) -> Option<usize> {
        self.output_len
    }
}
