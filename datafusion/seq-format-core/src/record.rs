/// One read's worth of data: identifier, optional header description, bases,
/// and (FASTQ only) per-base quality scores.
///
/// Optional fields are `None` when absent at source, never `Some("")`; the
/// distinction is preserved all the way into the Arrow columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Sequence identifier: the header up to the first whitespace.
    pub id: String,
    /// Header text after the identifier, if any.
    pub description: Option<String>,
    /// The sequence itself.
    pub sequence: String,
    /// Per-base quality scores; always `None` for FASTA records.
    pub quality_scores: Option<String>,
}

/// Splits a full header line into an identifier and an optional description.
///
/// The identifier runs up to the first whitespace; the remainder, trimmed of
/// leading whitespace, becomes the description. An empty remainder maps to
/// `None`.
pub fn split_definition(definition: &str) -> (String, Option<String>) {
    if let Some(pos) = definition.find(char::is_whitespace) {
        let (id, rest) = definition.split_at(pos);
        let description = rest.trim_start();
        if description.is_empty() {
            (id.to_string(), None)
        } else {
            (id.to_string(), Some(description.to_string()))
        }
    } else {
        (definition.to_string(), None)
    }
}
