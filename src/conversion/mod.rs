pub mod bands;
pub mod dice;
pub mod engine;
pub mod reference;
pub mod settings;

pub use bands::{validate_bands, validate_output, BandStatus, BandValidationReport};
pub use engine::{convert, convert_with_registry, determine_threat_tier};
pub use reference::{compare_with_reference, ReferenceReport};
pub use settings::{default_settings, validate_settings, ConversionSettings};
