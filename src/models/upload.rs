use crate::validation::format_file_size;

/// A product photo that passed validation and has been read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub mime_type: String,
    /// `data:<mime>;base64,...`, used both for preview and for transmission.
    pub preview: String,
    pub name: String,
    pub size: u64,
}

impl UploadedFile {
    pub fn display_size(&self) -> String {
        format_file_size(self.size)
    }
}
