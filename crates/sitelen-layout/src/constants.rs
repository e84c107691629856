//! Shared constants for block layout
//!
//! This module centralizes the tuning numbers and default size tables used
//! throughout the layout search.

// =============================================================================
// Search Policy
// =============================================================================

/// Options whose surface is this many times the smallest surface seen so far are pruned
pub const DEFAULT_SURFACE_FACTOR: f64 = 2.0;

/// Relative tolerance when comparing anchor coordinates
pub const ANCHOR_TOLERANCE: f64 = 1e-9;

/// Coordinates are quantized to multiples of this before hashing signatures
pub const SIGNATURE_QUANTUM: f64 = 1e-9;

// =============================================================================
// Default Word Sizes
// =============================================================================

/// Comma and colon: a thin horizontal bar
pub const SINGLE_PUNCTUATION: &[&str] = &["comma", "colon"];
pub const SINGLE_PUNCTUATION_SIZE: (f64, f64) = (4.0, 0.5);

/// Sentence terminators
pub const PUNCTUATION: &[&str] = &["period", "exclamation", "question"];
pub const PUNCTUATION_SIZE: (f64, f64) = (4.0, 0.75);

/// Context separator and banner
pub const LARGE_PUNCTUATION: &[&str] = &["la", "banner"];
pub const LARGE_PUNCTUATION_SIZE: (f64, f64) = (4.0, 1.0);

/// Modifiers drawn half height
pub const SMALL_MODIFIERS: &[&str] = &["kon", "lili", "mute", "sin"];
pub const SMALL_MODIFIER_SIZE: (f64, f64) = (1.0, 0.5);

/// Modifiers drawn half width
pub const NARROW_MODIFIERS: &[&str] = &["wan", "tu", "anu", "en", "kin"];
pub const NARROW_MODIFIER_SIZE: (f64, f64) = (0.5, 1.0);

// =============================================================================
// Default Syllable Sizes
// =============================================================================

/// Syllables drawn half width inside a cartouche
pub const NARROW_SYLLABLES: &[&str] = &[
    "li", "ni", "si", "lin", "nin", "sin", "le", "ne", "se", "len", "nen", "sen", "lo", "no", "so",
    "lon", "non", "son", "la", "na", "sa", "lan", "nan", "san", "lu", "nu", "su", "lun", "nun",
    "sun",
];
pub const NARROW_SYLLABLE_SIZE: (f64, f64) = (0.5, 1.0);

/// Size of every glyph that is not listed in a table
pub const REGULAR_SIZE: (f64, f64) = (1.0, 1.0);
