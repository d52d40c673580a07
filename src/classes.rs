//! Class-name table loaded once at startup.

use std::io::BufRead;
use std::path::Path;

use crate::error::{Error, Result};

/// Ordered list of class labels, one per network class index.
#[derive(Debug, Clone, Default)]
pub struct ClassNames {
    names: Vec<String>,
}

impl ClassNames {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Read one label per line. Trailing whitespace and trailing blank lines
    /// are dropped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut names = reader
            .lines()
            .map(|line| line.map(|l| l.trim_end().to_string()))
            .collect::<std::io::Result<Vec<_>>>()?;

        while names.last().is_some_and(|n| n.is_empty()) {
            names.pop();
        }

        Ok(Self { names })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            Error::ClassNames(format!("cannot open {}: {e}", path.display()))
        })?;
        let names = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!("loaded {} class names from {}", names.len(), path.display());
        Ok(names)
    }

    #[inline]
    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Annotation text for a detection: `"name:0.87"`, or `"0.87"` when no
    /// names are loaded or the index is unknown.
    pub fn label(&self, class_id: usize, confidence: f32) -> String {
        match self.get(class_id) {
            Some(name) => format!("{name}:{confidence:.2}"),
            None => format!("{confidence:.2}"),
        }
    }
}
