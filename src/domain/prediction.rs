//! Prediction result types.
//!
//! Represents the classifier output and the message rendered for it.

use serde::{Deserialize, Serialize};

/// Label the classifier uses for "subscribes to a term deposit".
pub const POSITIVE_LABEL: u8 = 1;

/// Raw classifier output for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class label (1 = subscribe)
    pub label: u8,

    /// Positive-class probability, when the model exposes one
    pub probability: Option<f64>,
}

impl Prediction {
    #[must_use]
    pub fn new(label: u8, probability: Option<f64>) -> Self {
        Self { label, probability }
    }

    #[must_use]
    pub fn subscribes(&self) -> bool {
        self.label == POSITIVE_LABEL
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.subscribes() {
            Verdict::Subscribe
        } else {
            Verdict::Decline
        }
    }
}

/// What the form tells the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Customer is predicted to subscribe
    Subscribe,
    /// Customer is predicted not to subscribe (any non-positive label)
    Decline,
}

impl Verdict {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Subscribe => "Customer is predicted to SUBSCRIBE to a term deposit (will subscribe).",
            Self::Decline => "Customer is predicted NOT to subscribe (will not subscribe).",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subscribe => write!(f, "SUBSCRIBE"),
            Self::Decline => write!(f, "NOT SUBSCRIBE"),
        }
    }
}

/// Result of one button press, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredictionOutcome {
    Success {
        prediction: Prediction,
        verdict: Verdict,
        created_at: chrono::DateTime<chrono::Utc>,
    },
    /// Classifier raised an error; the message carries its text verbatim.
    Failure { message: String },
}

impl PredictionOutcome {
    #[must_use]
    pub fn success(prediction: Prediction) -> Self {
        Self::Success {
            verdict: prediction.verdict(),
            prediction,
            created_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self::Failure {
            message: format!("Prediction failed: {error}"),
        }
    }

    /// Message shown in the verdict panel.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { verdict, .. } => verdict.message(),
            Self::Failure { message } => message,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
