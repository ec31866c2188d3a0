use serde::{Deserialize, Serialize};

/// One reference/prediction text pair.
///
/// Fields are read through accessors so an instance stays as constructed.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    reference: String,
    prediction: String,
}

impl Instance {
    pub fn new(reference: impl Into<String>, prediction: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            prediction: prediction.into(),
        }
    }

    /// An instance with only a reference, for combined runs where predictions are
    /// passed separately.
    pub fn reference_only(reference: impl Into<String>) -> Self {
        Self::new(reference, String::new())
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn prediction(&self) -> &str {
        &self.prediction
    }
}

/// Splits instances into parallel reference and prediction vectors.
pub(crate) fn split_instances(instances: &[Instance]) -> (Vec<String>, Vec<String>) {
    instances
        .iter()
        .map(|instance| (instance.reference.clone(), instance.prediction.clone()))
        .unzip()
}
