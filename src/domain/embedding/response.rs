//! Embedding response decoding and vector math

use serde_json::Value;

/// Which part of a provider response element held the vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingShape {
    /// `{"value": [...]}`
    Value,
    /// `{"values": [...]}`
    Values,
    /// The element itself is the array
    Bare,
    /// Nothing usable; decoded as an empty vector
    Missing,
}

/// Decode the vector for a single input out of a provider response element.
///
/// Compatibility shim: providers have shipped slightly different shapes for
/// the same payload, so the fields are tried in a fixed order (`value`,
/// `values`, then the element as a bare array) and anything else decodes to an
/// empty vector instead of failing. New shapes belong in the contract tests
/// below, not in more fallbacks.
pub fn decode_embedding_value(element: &Value) -> (Vec<f32>, EmbeddingShape) {
    if let Some(vector) = element.get("value").and_then(as_vector) {
        return (vector, EmbeddingShape::Value);
    }

    if let Some(vector) = element.get("values").and_then(as_vector) {
        return (vector, EmbeddingShape::Values);
    }

    if let Some(vector) = as_vector(element) {
        return (vector, EmbeddingShape::Bare);
    }

    (Vec::new(), EmbeddingShape::Missing)
}

fn as_vector(value: &Value) -> Option<Vec<f32>> {
    let items = value.as_array()?;

    items
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect()
}

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
