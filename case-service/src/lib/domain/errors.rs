/// Classification shared by every domain error.
///
/// Domain errors stay specific (which field collided, which entity is
/// missing); the inbound layer only needs the kind to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, e.g. an out of range success rate
    Validation,
    /// Missing, invalid or expired token, or unknown credentials
    Unauthorized,
    /// Valid identity with an insufficient role
    Forbidden,
    /// Referenced identity, client or assignment is absent
    NotFound,
    /// Uniqueness violation
    Conflict,
    /// Storage or backend failure not otherwise classified
    Internal,
}
