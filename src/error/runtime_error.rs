/// Represents all errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// A name was not bound anywhere in the scope chain.
    #[error("'{name}' is not defined")]
    UndefinedName {
        /// The name that was looked up.
        name: String,
    },
    /// A function was called with the wrong number of arguments.
    #[error("{name} expected {expected} arguments but received {found}")]
    ArityMismatch {
        /// Name of the function.
        name:     String,
        /// Number of parameters the function declares.
        expected: usize,
        /// Number of arguments supplied.
        found:    usize,
    },
    /// A value that is not a function was called in a way that cannot be
    /// read as multiplication.
    #[error("{kind} is not callable")]
    NotCallable {
        /// Description of the value.
        kind: String,
    },
    /// A value cannot be indexed or used as a subscript.
    #[error("{kind} cannot be indexed")]
    NotIndexable {
        /// Description of the value.
        kind: String,
    },
    /// A subscript contained a value that is not an integer.
    #[error("An array can only be indexed with integers")]
    NonIntegerIndex,
    /// A subscript pointed outside the array.
    #[error("Index {index} is out of bounds for axis {axis} with size {size}")]
    IndexOutOfBounds {
        /// The requested index, before negative wrap-around.
        index: i64,
        /// Axis that was indexed.
        axis:  usize,
        /// Length of that axis.
        size:  usize,
    },
    /// An expression produced no value where one was required.
    #[error("An empty expression cannot be used as {context}")]
    EmptyValue {
        /// Where the value was needed.
        context: &'static str,
    },
    /// A word list was used where a value was required.
    #[error("A word list cannot be used as {context}")]
    WordListValue {
        /// Where the value was needed.
        context: &'static str,
    },
    /// Two array shapes could not be broadcast together, or array elements
    /// had different shapes.
    #[error("Operands could not be broadcast together with shapes {left:?} and {right:?}")]
    ShapeMismatch {
        /// Shape of the left operand.
        left:  Vec<usize>,
        /// Shape of the right operand.
        right: Vec<usize>,
    },
    /// Evaluation nested deeper than the configured limit.
    #[error("Maximum recursion depth of {limit} exceeded")]
    RecursionDepthExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// A value had a type the operation does not support.
    #[error("Type error: {details}")]
    TypeError {
        /// Details about the mismatch.
        details: String,
    },
    /// A built-in received an argument it cannot work with.
    #[error("Invalid argument: {details}")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
    },
    /// `delete` was asked to remove an immutable binding.
    #[error("'{name}' is immutable and cannot be deleted")]
    ImmutableBinding {
        /// The protected name.
        name: String,
    },
}
