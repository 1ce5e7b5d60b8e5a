use serde::Deserialize;

/// A timed text block. Children subdivide their parent's time range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Caption {
    pub id: String,
    pub start: f32,
    pub end: f32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<Caption>,
}

impl Caption {
    /// Half-open `[start, end)`.
    #[must_use]
    pub fn contains(&self, time: f32) -> bool {
        self.start <= time && time < self.end
    }
}

/// The chain of captions active at `time`, outermost first.
#[must_use]
pub fn active_captions(captions: &[Caption], time: f32) -> Vec<&Caption> {
    let mut chain = Vec::new();
    let mut level = captions;
    while let Some(caption) = level.iter().find(|c| c.contains(time)) {
        chain.push(caption);
        level = &caption.children;
    }
    chain
}
