//! Security limits and capacity constants for the printf macros.
//!
//! All compile-time limits live here to prevent denial-of-service during
//! macro expansion and to size initial allocations.

// ============================================================================
// Security Limits (Compile-Time DoS Protection)
// ============================================================================

/// Maximum length of a format string in bytes.
///
/// Prevents compile-time DoS via extremely long format strings while
/// allowing all legitimate use cases.
pub const MAX_FORMAT_STRING_LEN: usize = 10_000;

/// Maximum number of tokens (literal runs plus placeholders) in a format
/// string. Prevents excessive code generation.
pub const MAX_TOKENS: usize = 256;

// ============================================================================
// Memory Pre-Allocation Hints
// ============================================================================

/// Initial capacity hint for the token vector.
///
/// Most format strings have 2-4 tokens, so this avoids initial reallocations.
pub const TOKENS_INITIAL_CAPACITY: usize = 4;

/// Initial capacity hint for literal text runs between placeholders.
pub const TEXT_SEGMENT_CAPACITY: usize = 16;
