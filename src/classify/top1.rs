use crate::error::ClassifyError;

/// Index and value of the highest probability; the first occurrence wins
/// ties.
///
/// Any NaN or infinity anywhere in the vector is an error, even if it would
/// not have been the maximum.
pub fn top1(probabilities: &[f32]) -> Result<(usize, f32), ClassifyError> {
    if let Some(i) = probabilities.iter().position(|p| !p.is_finite()) {
        return Err(ClassifyError::inference(format!(
            "non-finite probability {} at index {}",
            probabilities[i], i
        )));
    }

    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in probabilities.iter().enumerate() {
        match best {
            Some((_, b)) if p <= b => {}
            _ => best = Some((i, p)),
        }
    }
    best.ok_or_else(|| ClassifyError::inference("model returned no probabilities"))
}
