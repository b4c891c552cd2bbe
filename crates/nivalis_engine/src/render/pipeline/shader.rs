//! SPIR-V shader loading
//!
//! Shader binaries are read whole and converted to SPIR-V words. The
//! conversion rejects empty buffers, partial words and a missing SPIR-V
//! magic number; everything past the header is validated by the backend.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;

/// Entry point symbol used for every shader stage
pub const ENTRY_POINT: &std::ffi::CStr = c"main";

/// Read a shader binary fully into memory
pub fn read_shader_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    log::debug!("Read {} bytes of shader code from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Reinterpret shader bytes as SPIR-V words
///
/// Fails with [`io::ErrorKind::InvalidData`] when the buffer is empty, cannot
/// be split into whole 32-bit words, or does not start with the SPIR-V magic
/// number. Byte-swapped modules are converted to native order.
pub fn spirv_words(bytes: &[u8]) -> io::Result<Vec<u32>> {
    if bytes.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "shader binary is empty"));
    }
    ash::util::read_spv(&mut Cursor::new(bytes))
}
