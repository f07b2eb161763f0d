use serde::{Deserialize, Serialize};

use crate::settings::ScreeningSettings;
use crate::submission::SubmissionReceipt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScreeningOutcome {
    /// Average score below the threshold.
    BelowThreshold,
    AtOrAboveThreshold,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningSummary {
    pub average: f64,
    pub submissions: usize,
    pub outcome: ScreeningOutcome,
}

/// Scores in submission order plus the policy that turns them into an outcome.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    receipts: Vec<SubmissionReceipt>,
    settings: ScreeningSettings,
}

impl ScoreBoard {
    pub fn new(settings: ScreeningSettings) -> Self {
        Self {
            receipts: Vec::new(),
            settings,
        }
    }

    pub fn record(&mut self, receipt: SubmissionReceipt) {
        self.receipts.push(receipt);
    }

    pub fn scores(&self) -> Vec<f64> {
        self.receipts.iter().map(|r| r.score).collect()
    }

    pub fn receipts(&self) -> &[SubmissionReceipt] {
        &self.receipts
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    pub fn average(&self) -> Option<f64> {
        average(&self.scores())
    }

    /// `None` until the required number of submissions has been scored.
    pub fn summary(&self) -> Option<ScreeningSummary> {
        if self.receipts.len() < self.settings.required_submissions.max(1) {
            return None;
        }
        let average = self.average()?;
        Some(ScreeningSummary {
            average,
            submissions: self.receipts.len(),
            outcome: classify(average, self.settings.threshold),
        })
    }

    pub fn clear(&mut self) {
        self.receipts.clear();
    }
}

pub fn average(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

pub fn classify(average: f64, threshold: f64) -> ScreeningOutcome {
    if average < threshold {
        ScreeningOutcome::BelowThreshold
    } else {
        ScreeningOutcome::AtOrAboveThreshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn receipt(prompt_index: usize, score: f64) -> SubmissionReceipt {
        SubmissionReceipt {
            id: uuid::Uuid::new_v4().to_string(),
            prompt_index,
            score,
            image_bytes: 0,
            submitted_at: Utc::now(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_four_scores_average_below_threshold() {
        let mut board = ScoreBoard::new(ScreeningSettings::default());
        for (i, score) in [0.1, 0.2, 0.3, 0.9].into_iter().enumerate() {
            assert!(board.summary().is_none());
            board.record(receipt(i, score));
        }

        let summary = board.summary().unwrap();
        assert!((summary.average - 0.375).abs() < 1e-12);
        assert_eq!(summary.outcome, ScreeningOutcome::BelowThreshold);
        assert_eq!(board.scores(), vec![0.1, 0.2, 0.3, 0.9]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert_eq!(classify(0.4, 0.4), ScreeningOutcome::AtOrAboveThreshold);
        assert_eq!(classify(0.39, 0.4), ScreeningOutcome::BelowThreshold);
    }

    #[test]
    fn test_average_of_nothing_is_none() {
        assert!(average(&[]).is_none());
        assert!(ScoreBoard::default().average().is_none());
    }
}
