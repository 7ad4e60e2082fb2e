/// Error while reading or writing the node-types artifact.
#[derive(Debug)]
pub enum NodeTypesError {
    Json(serde_json::Error),
}

impl std::fmt::Display for NodeTypesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "node-types JSON error: {e}"),
        }
    }
}

impl std::error::Error for NodeTypesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
        }
    }
}
