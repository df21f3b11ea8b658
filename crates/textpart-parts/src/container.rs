//! Part file identity and series ordering
//!
//! A part file is named `{stem}-{index}-{count}.part`. The stem charset is
//! lowercase ASCII letters, digits, `_` and `.`, so the first `-` always ends
//! the stem.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::trace;

use textpart_core::{TextpartError, TextpartResult};

static PART_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z_.0-9]+)-([0-9]+)-([0-9]+)\.part$").expect("part name pattern")
});

static STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_.0-9]+$").expect("stem pattern"));

/// Whether `stem` can appear in a discoverable part filename.
pub fn is_valid_stem(stem: &str) -> bool {
    STEM.is_match(stem)
}

/// Identifies one part file of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkContainerId {
    stem: String,
    index: u64,
    count: u64,
    directory: PathBuf,
    path: PathBuf,
}

impl ChunkContainerId {
    /// Identify part `index` (1-based) of `count` in `directory`.
    pub fn new(
        stem: impl Into<String>,
        index: u64,
        count: u64,
        directory: impl Into<PathBuf>,
    ) -> TextpartResult<Self> {
        let stem = stem.into();
        if index == 0 {
            return Err(TextpartError::InvalidId(format!(
                "part indices start at 1 ({stem}-{index}-{count})"
            )));
        }
        if index > count {
            return Err(TextpartError::InvalidId(format!(
                "index is greater than the total count ({index} > {count})"
            )));
        }
        let directory = directory.into();
        let path = directory.join(part_basename(&stem, index, count));
        Ok(Self {
            stem,
            index,
            count,
            directory,
            path,
        })
    }

    /// Parse a part id from a file path.
    ///
    /// Returns `Ok(None)` when the basename is not a part filename for `stem`;
    /// directories routinely hold unrelated files. A part filename whose index
    /// is zero or exceeds its count is an error.
    pub fn from_path(stem: &str, path: &Path) -> TextpartResult<Option<Self>> {
        let Some(basename) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };
        let Some(caps) = PART_NAME.captures(basename) else {
            trace!(path = %path.display(), "ignoring: not a part filename");
            return Ok(None);
        };
        if &caps[1] != stem {
            trace!(path = %path.display(), stem, "ignoring: different stem");
            return Ok(None);
        }
        let (Ok(index), Ok(count)) = (caps[2].parse::<u64>(), caps[3].parse::<u64>()) else {
            trace!(path = %path.display(), "ignoring: index or count out of range");
            return Ok(None);
        };

        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut id = Self::new(stem, index, count, directory)?;
        id.path = path.to_path_buf();
        Ok(Some(id))
    }

    /// Order two ids of the same series by index.
    pub fn compare(&self, other: &Self) -> TextpartResult<Ordering> {
        if self.stem != other.stem || self.count != other.count {
            return Err(TextpartError::Comparison {
                left: self.basename(),
                right: other.basename(),
            });
        }
        Ok(self.index.cmp(&other.index))
    }

    /// Sort ids by index, failing if they do not all belong to one series.
    pub fn sort_series(mut ids: Vec<Self>) -> TextpartResult<Vec<Self>> {
        if let Some((head, rest)) = ids.split_first() {
            for id in rest {
                head.compare(id)?;
            }
        }
        ids.sort_by_key(|id| id.index);
        Ok(ids)
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Canonical filename: `{stem}-{index}-{count}.part`.
    pub fn basename(&self) -> String {
        part_basename(&self.stem, self.index, self.count)
    }

    /// The file this id refers to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ChunkContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.basename())
    }
}

fn part_basename(stem: &str, index: u64, count: u64) -> String {
    format!("{stem}-{index}-{count}.part")
}
