//! Story segmentation: split a story into sentence fragments.
//!
//! The splitter is deliberately naive. It cuts on every literal `.`, so
//! abbreviations ("Dr. Smith") and decimals ("3.5") are split as well. The
//! image model copes fine with a short fragment, and the caption shown next
//! to the picture is the fragment itself, so predictability wins over
//! linguistic accuracy here.

/// One sentence-like unit of the story, with its 0-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub index: usize,
    pub text: String,
}

/// Split `story` on `.`, trim each piece and drop the empty ones.
///
/// Never fails; an empty or punctuation-only story yields no fragments.
pub fn segment(story: &str) -> Vec<Fragment> {
    story
        .split('.')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(index, text)| Fragment {
            index,
            text: text.to_string(),
        })
        .collect()
}
