#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    /// The forward lookup returned no matches.
    NotFound { query: String },
    /// Transport failure, non-success status or undecodable response.
    Network(String),
}

impl GeocodeError {
    pub fn network(context: &str, err: impl std::fmt::Display) -> Self {
        GeocodeError::Network(format!("{context}: {err}"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GeocodeError::NotFound { .. })
    }
}

impl std::fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodeError::NotFound { query } => write!(f, "no place found for {query:?}"),
            GeocodeError::Network(msg) => write!(f, "geocoding service error: {msg}"),
        }
    }
}

impl std::error::Error for GeocodeError {}

#[cfg(test)]
mod tests {
    use super::GeocodeError;

    #[test]
    fn display_messages() {
        let nf = GeocodeError::NotFound {
            query: "Atlantis".to_string(),
        };
        assert_eq!(nf.to_string(), "no place found for \"Atlantis\"");
        assert!(nf.is_not_found());

        let net = GeocodeError::network("HTTP request failed", "connection refused");
        assert_eq!(
            net.to_string(),
            "geocoding service error: HTTP request failed: connection refused"
        );
        assert!(!net.is_not_found());
    }
}
