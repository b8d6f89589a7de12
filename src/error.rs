/// Recoverable conditions raised while evaluating junction sets.
///
/// None of these abort a run: callers record them as data-quality counts
/// and carry on with the remaining records.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("malformed junction id '{id}': {reason}")]
    MalformedJunctionId { id: String, reason: String },

    #[error("{set} set is empty; ratio is undefined")]
    EmptyInputSet { set: &'static str },

    #[error("annotation line {line}: missing '{field}' attribute")]
    MissingAnnotationFields { line: usize, field: String },

    #[error("breakpoint {breakpoint} overlaps no annotated exon")]
    NoGeneOverlap { breakpoint: String },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}
