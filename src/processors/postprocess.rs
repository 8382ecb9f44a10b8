//! Score interpretation: softmax and arg-max over raw model logits.

use crate::core::errors::ClassifierError;

/// Interpreted model output for one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Scores {
    /// Per-class probabilities, in class order, summing to 1 within
    /// floating-point tolerance.
    pub probabilities: Vec<f32>,
    /// Index of the winning class (first maximum on ties).
    pub predicted_index: usize,
}

/// Converts raw per-class logits into a probability distribution and a
/// selected class index.
///
/// The softmax is computed in its numerically stable form: the maximum logit
/// is subtracted from every logit before exponentiating, so large-magnitude
/// inputs cannot overflow. The predicted index is the position of the maximum
/// raw logit, with the first maximum winning ties; arg-max is invariant under
/// softmax's monotonic transform, so this matches the most probable class.
///
/// # Errors
///
/// Returns an invalid-input error on an empty logit vector. A single-element
/// input trivially yields probability 1.0 at index 0.
pub fn interpret(logits: &[f32]) -> Result<Scores, ClassifierError> {
    if logits.is_empty() {
        return Err(ClassifierError::invalid_input("logits must not be empty"));
    }

    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    let probabilities: Vec<f32> = exp.iter().map(|&e| e / sum).collect();

    let mut predicted_index = 0;
    for (i, &v) in logits.iter().enumerate().skip(1) {
        if v > logits[predicted_index] {
            predicted_index = i;
        }
    }

    Ok(Scores {
        probabilities,
        predicted_index,
    })
}
