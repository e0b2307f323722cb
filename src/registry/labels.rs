use crate::error::ClassifyError;

/// Ordered disease labels. Index `i` names output `i` of the crop's model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// One label per line. Trailing whitespace (including `\r`) is trimmed
    /// and trailing blank lines are ignored; a blank line between labels
    /// would shift every later index, so it is rejected.
    pub fn parse(bytes: &[u8], asset: &str) -> Result<LabelSet, ClassifyError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ClassifyError::model_load(asset, format!("labels are not UTF-8: {}", e)))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut labels: Vec<String> = text.lines().map(|l| l.trim_end().to_owned()).collect();
        while labels.last().is_some_and(|l| l.is_empty()) {
            labels.pop();
        }

        if labels.is_empty() {
            return Err(ClassifyError::model_load(asset, "label file is empty"));
        }
        if let Some(i) = labels.iter().position(|l| l.is_empty()) {
            return Err(ClassifyError::model_load(asset, format!("blank label at line {}", i + 1)));
        }

        Ok(LabelSet { labels })
    }

    pub fn from_labels<I, S>(labels: I) -> LabelSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LabelSet { labels: labels.into_iter().map(Into::into).collect() }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Newline-terminated, as read back by `parse`.
    pub fn to_text(&self) -> String {
        self.labels.iter().map(|l| format!("{}\n", l)).collect()
    }
}
