use thiserror::Error;

// -----------------------------------------------------------------------------
// AccessError

/// Failure to analyze a type or bind an instance.
///
/// Both variants are structural errors, detected before any field is
/// resolved. Field lookups never fail: an unknown id yields `None`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    /// The type is not a record.
    ///
    /// Pointers to records count as non-records too: bind the record itself.
    #[error("illegal type: `{type_name}` is not a record")]
    IllegalType { type_name: &'static str },

    /// The instance does not have the type the shape was built for.
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::AccessError;

    #[test]
    fn display() {
        let err = AccessError::IllegalType { type_name: "i32" };
        assert_eq!(err.to_string(), "illegal type: `i32` is not a record");

        let err = AccessError::TypeMismatch {
            expected: "a::A",
            found: "b::B",
        };
        assert_eq!(err.to_string(), "type mismatch: expected `a::A`, found `b::B`");
    }
}
