use std::fs::File;
use std::io::{self, Read, Seek};

/// Every XLSX container is a ZIP archive starting with a local file header.
const ZIP_LOCAL_HEADER: [u8; 4] = *b"PK\x03\x04";

/// Checks a freshly opened file for the ZIP signature, leaving it rewound.
pub fn is_zip_archive(file: &mut File) -> io::Result<bool> {
    let mut signature = [0u8; 4];
    let matched = match file.read_exact(&mut signature) {
        Ok(()) => signature == ZIP_LOCAL_HEADER,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(e),
    };
    file.rewind()?;
    Ok(matched)
}
