use ark_std::fmt::Debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GarbleError {
    /// A computed output label matches neither stored label for its wire,
    /// signalling corruption of the garbled output
    OutputLabelNotRecognized,
    /// The circuit was deserialized and its random-block generator has
    /// not been reinitialized
    RandomSourceNotSeeded,
    /// A decoder hit a truncation or an out-of-range field
    InvalidEncoding(&'static str),
}
