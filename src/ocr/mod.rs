pub mod cache;
pub mod engine;
pub mod fusion;
pub mod preprocess;
pub mod profile;
pub mod setup;
pub mod token;

pub use cache::ChangeDetector;
pub use engine::{Recognizer, TesseractCli};
pub use fusion::{fuse, FusionOptions};
pub use preprocess::{normalize, NormalizeParams, NormalizedImage};
pub use profile::{escalation_profiles, primary_profiles, RecognitionProfile};
pub use setup::{locate_tesseract, tesseract_status, TesseractPaths};
pub use token::Token;
