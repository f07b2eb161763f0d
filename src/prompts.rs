use serde::{Deserialize, Serialize};

/// The drawing tasks of one screening run, in order.
pub const SCREENING_PROMPTS: [&str; 4] = [
    "Task 01: Draw an analog clock displaying the time 11:05",
    "Task 02: Join two points with a straight continuous horizontal line four times.",
    "Task 03: Join two points with a straight continuous vertical line four times.",
    "Task 04: Trace a continuous circle four times",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PromptSequence {
    prompts: Vec<String>,
    index: usize,
}

impl Default for PromptSequence {
    fn default() -> Self {
        Self::new(SCREENING_PROMPTS.iter().map(|p| p.to_string()).collect())
    }
}

impl PromptSequence {
    pub fn new(prompts: Vec<String>) -> Self {
        Self { prompts, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn current(&self) -> Option<&str> {
        self.prompts.get(self.index).map(String::as_str)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.prompts.len()
    }

    /// Move to the next prompt. Returns false when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_all_four_prompts() {
        let mut prompts = PromptSequence::default();
        assert_eq!(prompts.len(), 4);
        assert!(prompts.current().unwrap().starts_with("Task 01"));

        assert!(prompts.advance());
        assert!(prompts.advance());
        assert!(prompts.advance());
        assert!(prompts.is_last());
        assert!(prompts.current().unwrap().starts_with("Task 04"));

        assert!(!prompts.advance());
        assert_eq!(prompts.index(), 3);
    }
}
