/// What the parser does with a malformed line or an incomplete track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log a warning, skip the line (or drop the track) and keep scanning.
    #[default]
    Lenient,
    /// Return the first problem as an error and stop until `restart`.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    pub error_policy: ErrorPolicy,
}

impl ParserConfig {
    pub fn lenient() -> Self {
        Self {
            error_policy: ErrorPolicy::Lenient,
        }
    }

    pub fn strict() -> Self {
        Self {
            error_policy: ErrorPolicy::Strict,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.error_policy == ErrorPolicy::Strict
    }
}
