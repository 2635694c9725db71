use std::{borrow::Cow, collections::HashMap};

/// Art styles in model output order. Index `i` of a score vector belongs to `ART_STYLES[i]`.
pub const ART_STYLES: [&str; 8] = [
    "Gond",
    "Kalighat",
    "Kangra",
    "Kerala Mural",
    "Madhubani",
    "Mandana",
    "Pichwai",
    "Warli",
];

static DESCRIPTIONS: [(&str, &str); 8] = [
    (
        "Gond",
        "Gond art from Madhya Pradesh uses dots and lines to create images of nature, animals, and folklore, with vibrant colors and intricate patterns inspired by the natural world.",
    ),
    (
        "Kalighat",
        "Kalighat painting from West Bengal is known for bold, simplified figures created as souvenirs near the Kalighat temple, often carrying satirical social commentary.",
    ),
    (
        "Kangra",
        "Kangra miniature painting from Himachal Pradesh depicts love, devotion, and nature with delicate brushwork, soft lyrical colors, and romantic themes from Indian poetry.",
    ),
    (
        "Kerala Mural",
        "Kerala mural art is temple art featuring Hindu deities with bold outlines, vivid colors, and intricate detailing, known for its distinctive eye styling and divine expressions.",
    ),
    (
        "Madhubani",
        "Madhubani painting from Bihar is characterized by complex geometric patterns, natural elements, and scenes from mythology, drawn in natural pigments with double line borders.",
    ),
    (
        "Mandana",
        "Mandana from Rajasthan is floor and wall art with geometric and figurative patterns, traditionally drawn in chalk on red ochre for festivals and auspicious occasions.",
    ),
    (
        "Pichwai",
        "Pichwai from Nathdwara, Rajasthan, consists of large devotional paintings of Lord Krishna in various moods and seasons, with rich colors and textile-like patterns.",
    ),
    (
        "Warli",
        "Warli art from Maharashtra uses basic geometric shapes in white pigment on mud walls to depict daily life, nature, and celebrations.",
    ),
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("Label index {index} out of range for {len} labels")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered class names plus a description table
#[derive(Debug, Clone)]
pub struct LabelRegistry {
    labels: Vec<String>,
    descriptions: HashMap<String, String>,
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::new(
            ART_STYLES.iter().map(|s| s.to_string()).collect(),
            DESCRIPTIONS
                .iter()
                .map(|(label, text)| (label.to_string(), text.to_string()))
                .collect(),
        )
    }
}

impl LabelRegistry {
    pub fn new(labels: Vec<String>, descriptions: HashMap<String, String>) -> Self {
        Self {
            labels,
            descriptions,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_at(&self, index: usize) -> Result<&str, LabelError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or(LabelError::IndexOutOfRange {
                index,
                len: self.labels.len(),
            })
    }

    pub fn description_for(&self, label: &str) -> Cow<'_, str> {
        match self.descriptions.get(label) {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Owned(format!(
                "This artwork has been identified as {label} style."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_style_has_a_description() {
        let registry = LabelRegistry::default();
        assert_eq!(registry.len(), 8);
        for label in registry.labels() {
            assert!(
                !registry
                    .description_for(label)
                    .starts_with("This artwork has been identified"),
                "missing description for {label}"
            );
        }
    }

    #[test]
    fn label_order_matches_model_output() {
        let registry = LabelRegistry::default();
        assert_eq!(registry.label_at(0), Ok("Gond"));
        assert_eq!(registry.label_at(3), Ok("Kerala Mural"));
        assert_eq!(registry.label_at(7), Ok("Warli"));
    }

    #[test]
    fn label_at_out_of_range() {
        let registry = LabelRegistry::default();
        assert_eq!(
            registry.label_at(8),
            Err(LabelError::IndexOutOfRange { index: 8, len: 8 })
        );
    }

    #[test]
    fn unmapped_label_gets_fallback() {
        let registry = LabelRegistry::new(vec!["Phad".to_string()], HashMap::new());
        assert_eq!(
            registry.description_for("Phad"),
            "This artwork has been identified as Phad style."
        );
    }
}
