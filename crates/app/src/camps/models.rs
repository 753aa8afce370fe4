//! Camps data models.

use std::{fs, io, path::Path};

use camp_registry::{camps::CampId, documents::DocumentType};

/// File picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Filename sent to the store
    pub file_name: String,

    /// File content
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a file from disk, keeping its filename.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or has no filename.
    pub fn read(path: &Path) -> io::Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no filename"))?
            .to_string();

        Ok(Self {
            file_name,
            bytes: fs::read(path)?,
        })
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }
}

/// Document upload payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    /// Owning camp
    pub camp: CampId,

    /// Document type
    pub kind: DocumentType,

    /// File to store
    pub file: UploadFile,
}
