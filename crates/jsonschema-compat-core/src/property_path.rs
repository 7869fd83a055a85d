//! Location of a value inside a JSON document, as reported in subtyping
//! failures: `#.user.tags[0]`, `#.scores[string]`, `#.items[number]`.
//!
//! This addresses data, not schema keywords, so it is distinct from the JSON
//! pointers used in error paths.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named object property.
    Key(String),
    /// String-keyed index. `None` stands for every key.
    StringIndex(Option<String>),
    /// Array position. `None` stands for every position.
    NumberIndex(Option<usize>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// The document root, rendered `#`.
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path with `segment` appended.
    pub fn join(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn key(&self, key: &str) -> Self {
        self.join(PathSegment::Key(key.to_string()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.join(PathSegment::NumberIndex(Some(index)))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::StringIndex(None) => f.write_str("[string]")?,
                PathSegment::StringIndex(Some(key)) => write!(f, "[\"{}\"]", key)?,
                PathSegment::NumberIndex(None) => f.write_str("[number]")?,
                PathSegment::NumberIndex(Some(index)) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
