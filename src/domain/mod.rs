// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing graph
// datasets and metric observations.
//
// Rules for this layer:
//   - NO burn tensor types
//   - NO file I/O
//   - ndarray is allowed: a dense matrix is a domain value here
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// Dataset identifiers, labels, splits and the preprocessed graph
pub mod dataset;

// Loader and listener abstractions that other layers implement
pub mod traits;
