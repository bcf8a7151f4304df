use crate::errors::BindError;
use std::path::Path;

/// Returns true when `pattern` contains glob metacharacters and therefore
/// names a set of files rather than a single path.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Returns true when `name` ends with one of a format's recognized suffixes.
pub fn has_recognized_suffix(name: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|suffix| name.ends_with(suffix))
}

/// Ordered, non-empty list of input paths resolved from a glob pattern or a
/// literal file path.
///
/// A file set is built once when a scan binds and never mutated afterwards.
/// Sets resolved from a glob are `multi_file` and their scans carry a
/// trailing `file_name` column; a literal path resolves to a single-file set
/// without it.
#[derive(Clone, Debug)]
pub struct FileSet {
    paths: Vec<String>,
    multi_file: bool,
}

impl FileSet {
    /// Resolves `pattern` into a file set.
    ///
    /// Glob patterns are expanded against the filesystem and fail with
    /// [`BindError::FileSetEmpty`] when nothing matches; literal paths fail
    /// with [`BindError::FileNotFound`] when absent.
    pub fn resolve(pattern: &str) -> Result<Self, BindError> {
        if is_glob_pattern(pattern) {
            let entries = glob::glob(pattern).map_err(|source| BindError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            let mut paths = Vec::new();
            for entry in entries {
                let path = entry.map_err(|e| {
                    let path = e.path().display().to_string();
                    BindError::Io {
                        path,
                        source: e.into_error(),
                    }
                })?;
                paths.push(path.to_string_lossy().into_owned());
            }
            if paths.is_empty() {
                return Err(BindError::FileSetEmpty {
                    pattern: pattern.to_string(),
                });
            }
            paths.sort();
            Ok(Self {
                paths,
                multi_file: true,
            })
        } else {
            if !Path::new(pattern).exists() {
                return Err(BindError::FileNotFound {
                    path: pattern.to_string(),
                });
            }
            Ok(Self {
                paths: vec![pattern.to_string()],
                multi_file: false,
            })
        }
    }

    /// The resolved paths, in scan order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Number of files in the set.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false for a successfully resolved set.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// True when the set came from a glob and scans report `file_name`.
    pub fn is_multi_file(&self) -> bool {
        self.multi_file
    }

    #[cfg(test)]
    pub(crate) fn from_parts(paths: Vec<String>, multi_file: bool) -> Self {
        Self { paths, multi_file }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("reads/*.fastq"));
        assert!(is_glob_pattern("reads/sample_?.fa"));
        assert!(is_glob_pattern("reads/[ab].fa"));
        assert!(!is_glob_pattern("reads/sample.fa"));
    }

    #[test]
    fn test_resolve_literal_path() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("sample.fasta");
        File::create(&path).unwrap();

        let file_set = FileSet::resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(file_set.len(), 1);
        assert!(!file_set.is_multi_file());
    }

    #[test]
    fn test_resolve_missing_literal_path() {
        let err = FileSet::resolve("/nonexistent/sample.fasta").unwrap_err();
        assert!(matches!(err, BindError::FileNotFound { .. }));
    }

    #[test]
    fn test_resolve_glob_in_order() {
        let tmp_dir = TempDir::new().unwrap();
        File::create(tmp_dir.path().join("b.fasta")).unwrap();
        File::create(tmp_dir.path().join("a.fasta")).unwrap();
        File::create(tmp_dir.path().join("ignored.fastq")).unwrap();

        let pattern = format!("{}/*.fasta", tmp_dir.path().display());
        let file_set = FileSet::resolve(&pattern).unwrap();
        assert_eq!(file_set.len(), 2);
        assert!(file_set.is_multi_file());
        assert!(file_set.paths()[0].ends_with("a.fasta"));
        assert!(file_set.paths()[1].ends_with("b.fasta"));
    }

    #[test]
    fn test_resolve_empty_glob() {
        let tmp_dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.fasta", tmp_dir.path().display());
        let err = FileSet::resolve(&pattern).unwrap_err();
        assert!(matches!(err, BindError::FileSetEmpty { .. }));
    }

    #[test]
    fn test_has_recognized_suffix() {
        let suffixes = &[".fa", ".fasta", ".fa.gz", ".fasta.gz"];
        assert!(has_recognized_suffix("reads.fa", suffixes));
        assert!(has_recognized_suffix("reads.fasta.gz", suffixes));
        assert!(!has_recognized_suffix("reads.fastq", suffixes));
        assert!(!has_recognized_suffix("reads.fa.zst", suffixes));
    }
}
