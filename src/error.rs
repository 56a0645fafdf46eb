/// Failures at the JSON boundary. Defects in a well-formed program are never
/// errors; they are diagnostics inside an `AnalyzeResult`.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("failed to parse program JSON: {0}")]
    Program(#[source] serde_json::Error),
    #[error("failed to parse analyzer options: {0}")]
    Options(#[source] serde_json::Error),
    #[error("failed to serialize analysis result: {0}")]
    Serialize(#[source] serde_json::Error),
}
