/// Represents all errors that can occur while saving or restoring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The snapshot text is not valid JSON for a snapshot.
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// Array data was not valid base64 or did not match its shape.
    #[error("Malformed array data: {details}")]
    ArrayData {
        /// What went wrong while decoding.
        details: String,
    },
    /// A record pointed at a scope or function slot the snapshot lacks.
    #[error("Snapshot refers to missing {kind} #{index}")]
    DanglingReference {
        /// `scope` or `function`.
        kind:  &'static str,
        /// The missing slot.
        index: usize,
    },
    /// A built-in recorded in the snapshot is not known to this build.
    #[error("Snapshot refers to unknown built-in '{name}'")]
    UnknownBuiltin {
        /// Name of the missing built-in.
        name: String,
    },
}
