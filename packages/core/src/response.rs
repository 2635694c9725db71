//! Ranking and enrichment of raw classifier scores
use crate::{
    labels::LabelRegistry,
    registry::{LoadedModel, ModelSlot},
};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelConfidence {
    pub label: String,
    pub confidence: f64,
}

/// Result of a single `/predict` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    #[serde(rename = "label")]
    pub predicted_label: String,
    pub confidence: f64,
    pub description: String,
    /// Every class, highest confidence first
    #[serde(rename = "all_predictions")]
    pub distribution: Vec<LabelConfidence>,
    #[serde(rename = "version")]
    pub version_tag: String,
    #[serde(rename = "model")]
    pub model_used: ModelSlot,
    pub last_trained: String,
}

/// Index of the highest score; the lowest index wins a tie. NaN scores never win.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some(b) if *score <= scores[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Descending by confidence with NaN ranked last; a total order.
fn by_confidence_desc(a: &LabelConfidence, b: &LabelConfidence) -> Ordering {
    match (a.confidence.is_nan(), b.confidence.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal),
    }
}

/// Builds the response for `scores`, which must hold exactly one score per label.
pub fn assemble(scores: &[f32], model: &LoadedModel<'_>, labels: &LabelRegistry) -> Prediction {
    debug_assert_eq!(scores.len(), labels.len());

    let mut distribution: Vec<LabelConfidence> = labels
        .labels()
        .iter()
        .zip(scores)
        .map(|(label, score)| LabelConfidence {
            label: label.clone(),
            confidence: f64::from(*score),
        })
        .collect();

    let predicted_index = argmax(scores).unwrap_or(0);
    let predicted_label = distribution
        .get(predicted_index)
        .map(|entry| entry.label.clone())
        .unwrap_or_default();
    let confidence = scores
        .get(predicted_index)
        .copied()
        .map(f64::from)
        .unwrap_or_default();

    // stable: equal confidences keep label order
    distribution.sort_by(by_confidence_desc);

    Prediction {
        description: labels.description_for(&predicted_label).into_owned(),
        predicted_label,
        confidence,
        distribution,
        version_tag: model.info.version.clone(),
        model_used: model.slot,
        last_trained: model.info.last_trained.clone(),
    }
}
