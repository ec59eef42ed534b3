use std::fmt;

/// A single request descriptor. Owned by the caller for the duration of one
/// dispatch; `index` is its position in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    index: usize,
    url: String,
}

impl Target {
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
