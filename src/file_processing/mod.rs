pub mod analyzer;
pub mod validator;

pub use analyzer::{FileAnalyzer, MediaKind, format_file_size};
pub use validator::{ALLOWED_EXTENSIONS, FileValidator, extract_extension, secure_filename};
