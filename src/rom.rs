use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use plum8::LoadError;

/// Read a whole ROM image from disk
pub fn read_rom<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let mut rom = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut rom))
        .map_err(LoadError::IoFailure)
        .with_context(|| format!("failed to read ROM {}", path.display()))?;
    debug!("read {} bytes from {}", rom.len(), path.display());
    Ok(rom)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[test]
    fn reads_whole_file() {
        let path = std::env::temp_dir().join(format!("plum8-rom-{}.ch8", std::process::id()));
        fs::write(&path, [0x00u8, 0xE0, 0x12, 0x02]).unwrap();
        let rom = read_rom(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(rom.unwrap(), vec![0x00, 0xE0, 0x12, 0x02]);
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_rom("/nonexistent/plum8/missing.ch8").unwrap_err();
        assert!(err.to_string().contains("missing.ch8"));
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::IoFailure(_))
        ));
    }
}
