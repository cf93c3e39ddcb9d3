/// Detection options. Defaults match the engine's editing use case: every
/// role-classifiable element with at least one character of own text.
#[derive(Clone, Debug)]
pub struct DetectOptions {
    pub min_text_len: usize,
    pub max_text_len: usize,
    /// When non-empty, only these tag names are considered.
    pub include_tags: Vec<String>,
    /// Tag names never considered, even if role-classifiable.
    pub exclude_tags: Vec<String>,
    /// Order headings before everything else (stable within each group).
    pub prioritize_headings: bool,
    /// Exclude descendants of an already-selected ancestor, preventing
    /// double-editable nesting.
    pub skip_nested: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            min_text_len: 1,
            max_text_len: 5_000,
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            prioritize_headings: false,
            skip_nested: true,
        }
    }
}

impl DetectOptions {
    pub(crate) fn tag_considered(&self, tag: &str) -> bool {
        if self.exclude_tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
        if self.include_tags.is_empty() {
            return true;
        }
        self.include_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
