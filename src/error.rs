/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code: characters the scanner cannot classify, input the grammar cannot
/// consume completely and trees the lowering pass does not understand.
pub mod parse_error;
/// Persistence errors.
///
/// Raised while turning a snapshot back into live scopes: malformed JSON,
/// references to scopes or functions the snapshot does not contain, and
/// built-ins that no longer exist.
pub mod persist_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: unknown
/// names, bad calls and subscripts, values used where they make no sense,
/// shape mismatches and runaway recursion.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use persist_error::PersistError;
pub use runtime_error::RuntimeError;

/// Any error the session surfaces to a front end.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The input parsed but failed while evaluating.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// A snapshot could not be saved or restored.
    #[error(transparent)]
    Persist(#[from] PersistError),
}
