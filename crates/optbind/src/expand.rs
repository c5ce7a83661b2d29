//! Response-file expansion.
//!
//! A token starting with `@` names a file whose lines are spliced into the
//! argument stream in its place, recursively. Each file may be used at most
//! once per expansion; this catches cycles and plain repeats alike.

use crate::error::ResponseFileError;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Something that can stand in for one raw command-line argument.
///
/// `None` entries are dropped before expansion.
pub trait RawArgument {
    fn into_raw(self) -> Option<String>;
}

impl RawArgument for String {
    fn into_raw(self) -> Option<String> {
        Some(self)
    }
}

impl RawArgument for &str {
    fn into_raw(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl RawArgument for &String {
    fn into_raw(self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: RawArgument> RawArgument for Option<T> {
    fn into_raw(self) -> Option<String> {
        self.and_then(RawArgument::into_raw)
    }
}

/// An argument list that expands response files each time it is iterated.
///
/// Every call to [`Arguments::iter`] starts a fresh expansion with its own
/// record of visited files.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    raw: Vec<String>,
}

impl Arguments {
    pub fn new<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: RawArgument,
    {
        Self {
            raw: args.into_iter().filter_map(RawArgument::into_raw).collect(),
        }
    }

    /// The process arguments, without the program name.
    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1))
    }

    pub fn iter(&self) -> Expander<std::vec::IntoIter<String>> {
        expand(self.raw.clone())
    }

    /// Expand fully, stopping at the first error.
    pub fn to_vec(&self) -> Result<Vec<String>, ResponseFileError> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = Result<String, ResponseFileError>;
    type IntoIter = Expander<std::vec::IntoIter<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Expand response files lazily over `args`.
pub fn expand<I>(args: I) -> Expander<I::IntoIter>
where
    I: IntoIterator,
    I::Item: RawArgument,
{
    Expander {
        args: args.into_iter(),
        files: Vec::new(),
        visited: HashSet::new(),
        failed: false,
    }
}

/// Iterator produced by [`expand`]. Stops for good after the first error.
pub struct Expander<I> {
    args: I,
    /// Lines still to be produced, innermost file last.
    files: Vec<VecDeque<String>>,
    visited: HashSet<PathBuf>,
    failed: bool,
}

impl<I> Expander<I> {
    fn open(&mut self, name: &str) -> Result<(), ResponseFileError> {
        let path = canonical(name)?;
        if !self.visited.insert(path.clone()) {
            return Err(ResponseFileError::Repeated { path });
        }
        // Read whole and close before handing out any line
        let content = std::fs::read_to_string(&path).map_err(|source| ResponseFileError::Io {
            path: path.clone(),
            source,
        })?;
        let lines: VecDeque<String> = content.lines().map(str::to_string).collect();
        debug!(path = %path.display(), lines = lines.len(), "expanding response file");
        self.files.push(lines);
        Ok(())
    }
}

/// Absolute path with `.`, `..` and symlinks resolved, so every spelling of
/// one file maps to the same key.
fn canonical(name: &str) -> Result<PathBuf, ResponseFileError> {
    std::fs::canonicalize(Path::new(name)).map_err(|source| ResponseFileError::Io {
        path: PathBuf::from(name),
        source,
    })
}

impl<I> Iterator for Expander<I>
where
    I: Iterator,
    I::Item: RawArgument,
{
    type Item = Result<String, ResponseFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let next = match self.files.last_mut() {
                Some(lines) => match lines.pop_front() {
                    Some(line) => line,
                    None => {
                        self.files.pop();
                        continue;
                    }
                },
                None => match self.args.next()?.into_raw() {
                    Some(arg) => arg,
                    None => continue,
                },
            };

            match next.strip_prefix('@') {
                Some(name) => {
                    if let Err(err) = self.open(name) {
                        self.failed = true;
                        self.files.clear();
                        return Some(Err(err));
                    }
                }
                None => return Some(Ok(next)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn response_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    fn at(file: &NamedTempFile) -> String {
        format!("@{}", file.path().display())
    }

    #[test]
    fn plain_arguments_pass_through() {
        let out: Vec<String> = expand(["1", "2", "", "A"]).map(Result::unwrap).collect();
        assert_eq!(out, ["1", "2", "", "A"]);
    }

    #[test]
    fn none_entries_are_dropped() {
        let input = vec![Some("1"), None, Some("2"), Some(""), None];
        let out = Arguments::new(input).to_vec().unwrap();
        assert_eq!(out, ["1", "2", ""]);
    }

    #[test]
    fn response_file_is_inlined() {
        let file = response_file(&["2", "3"]);
        let out = Arguments::new(["1".to_string(), at(&file), "4".to_string()])
            .to_vec()
            .unwrap();
        assert_eq!(out, ["1", "2", "3", "4"]);
    }

    #[test]
    fn nested_response_files() {
        let inner = response_file(&["3", "4"]);
        let outer = response_file(&["2", &at(&inner), "5"]);
        let out = Arguments::new(["1".to_string(), at(&outer), "6".to_string()])
            .to_vec()
            .unwrap();
        assert_eq!(out, ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn empty_response_file_contributes_nothing() {
        let file = response_file(&[]);
        let out = Arguments::new(["1".to_string(), at(&file), "2".to_string()])
            .to_vec()
            .unwrap();
        assert_eq!(out, ["1", "2"]);
    }

    #[test]
    fn lines_are_verbatim() {
        let file = response_file(&["  spaced ", "# not a comment", "\"quoted\""]);
        let out = Arguments::new([at(&file)]).to_vec().unwrap();
        assert_eq!(out, ["  spaced ", "# not a comment", "\"quoted\""]);
    }

    #[test]
    fn repeated_file_is_rejected() {
        let file = response_file(&["2", "3"]);
        let args = Arguments::new(["1".to_string(), at(&file), at(&file), "4".to_string()]);
        let err = args.to_vec().unwrap_err();
        assert!(matches!(err, ResponseFileError::Repeated { .. }), "Got: {err:?}");
    }

    #[test]
    fn repeat_through_parent_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let a = dir.path().join("a.rsp");
        std::fs::write(&a, "x\n").unwrap();

        let args = Arguments::new([
            format!("@{}", a.display()),
            format!("@{}/sub/../a.rsp", dir.path().display()),
        ]);
        let err = args.to_vec().unwrap_err();
        assert!(matches!(err, ResponseFileError::Repeated { .. }), "Got: {err:?}");
    }

    #[test]
    fn dot_segment_spelling_is_the_same_file() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.rsp");
        std::fs::write(&a, "x\n").unwrap();

        let mut iter = expand([
            format!("@{}", a.display()),
            format!("@{}/./a.rsp", dir.path().display()),
        ]);
        assert_eq!(iter.next().unwrap().unwrap(), "x");
        assert!(matches!(
            iter.next(),
            Some(Err(ResponseFileError::Repeated { .. }))
        ));
    }

    #[test]
    fn cycle_is_rejected() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.rsp");
        let b = dir.path().join("b.rsp");
        std::fs::write(&a, format!("2\n@{}\n3\n", b.display())).unwrap();
        std::fs::write(&b, format!("2\n@{}\n3\n", a.display())).unwrap();

        let mut iter = expand([format!("@{}", a.display())]);
        assert_eq!(iter.next().unwrap().unwrap(), "2");
        assert_eq!(iter.next().unwrap().unwrap(), "2");
        assert!(matches!(
            iter.next(),
            Some(Err(ResponseFileError::Repeated { .. }))
        ));
        assert!(iter.next().is_none());
    }

    #[test]
    fn each_iteration_starts_fresh() {
        let file = response_file(&["x"]);
        let args = Arguments::new([at(&file)]);
        assert_eq!(args.to_vec().unwrap(), ["x"]);
        assert_eq!(args.to_vec().unwrap(), ["x"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.rsp");
        let err = Arguments::new([format!("@{}", missing.display())])
            .to_vec()
            .unwrap_err();
        assert!(matches!(err, ResponseFileError::Io { .. }), "Got: {err:?}");
    }
}
