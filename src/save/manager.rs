use super::records::{migrate_legacy_json, SaveData};
use crate::core::constants::{SAVE_FILE_NAME, SAVE_VERSION_MAGIC};
use crate::core::game_state::GameState;
use directories::ProjectDirs;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Manages saving and loading game state with checksummed binary format
#[derive(Debug, Clone)]
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Creates a new SaveManager instance
    ///
    /// Sets up the save directory at the appropriate location for the platform
    /// using the `directories` crate.
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "heroville").ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine data directory")
        })?;

        let data_dir = project_dirs.data_dir();
        fs::create_dir_all(data_dir)?;

        Ok(Self {
            save_path: data_dir.join(SAVE_FILE_NAME),
        })
    }

    /// Uses an explicit file instead of the platform directory. The parent
    /// directory is created if needed.
    pub fn with_path(save_path: impl Into<PathBuf>) -> io::Result<Self> {
        let save_path = save_path.into();
        if let Some(parent) = save_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { save_path })
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Saves the game state to disk with checksum verification
    ///
    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - Serialized save data (variable length)
    /// - SHA256 checksum (32 bytes)
    pub fn save(&self, state: &GameState) -> io::Result<()> {
        self.save_data(&SaveData::from_state(state))
    }

    pub fn save_data(&self, save: &SaveData) -> io::Result<()> {
        let data =
            bincode::serialize(save).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let data_len = u32::try_from(data.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "Save data exceeds 4 GiB")
        })?;

        // Compute checksum over version + length + data
        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let mut file = fs::File::create(&self.save_path)?;
        file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;

        debug!(path = %self.save_path.display(), bytes = data.len(), "game saved");
        Ok(())
    }

    /// Loads the game state from disk with checksum verification
    ///
    /// Returns an error if:
    /// - The file doesn't exist
    /// - The version magic is incorrect
    /// - The checksum verification fails
    /// - The data cannot be deserialized
    pub fn load(&self, rng: &mut impl Rng) -> io::Result<GameState> {
        Ok(self.load_data()?.into_state(rng))
    }

    pub fn load_data(&self) -> io::Result<SaveData> {
        let mut file = fs::File::open(&self.save_path)?;

        // Read and verify version magic
        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);

        if version != SAVE_VERSION_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid save version: expected 0x{:016X}, got 0x{:016X}",
                    SAVE_VERSION_MAGIC, version
                ),
            ));
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        // Unverified until the checksum matches; bounded by the file size.
        let remaining = file
            .metadata()?
            .len()
            .saturating_sub((version_bytes.len() + length_bytes.len()) as u64);
        if u64::from(data_len) + 32 > remaining {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Save data length {} exceeds file size ({} bytes after header)",
                    data_len, remaining
                ),
            ));
        }

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        let computed_checksum = hasher.finalize();

        if stored_checksum != computed_checksum.as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Checksum verification failed",
            ));
        }

        bincode::deserialize(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Writes a human-readable copy of the game.
    pub fn export_json(&self, state: &GameState, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&SaveData::from_state(state))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)?;
        info!(path = %path.display(), "game exported");
        Ok(())
    }

    /// Reads a JSON export, upgrading legacy potion counts first.
    pub fn import_json(&self, path: &Path, rng: &mut impl Rng) -> io::Result<GameState> {
        let text = fs::read_to_string(path)?;
        let mut value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if migrate_legacy_json(&mut value) {
            info!(path = %path.display(), "migrated legacy potion counts");
        }
        let save: SaveData = serde_json::from_value(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(save.into_state(rng))
    }

    /// Checks if a save file exists
    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Removes the save file. Missing files are not an error.
    pub fn delete(&self) -> io::Result<()> {
        match fs::remove_file(&self.save_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn temp_manager(name: &str) -> SaveManager {
        let dir = std::env::temp_dir().join(format!(
            "heroville-save-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        SaveManager::with_path(dir.join(SAVE_FILE_NAME)).expect("Failed to create SaveManager")
    }

    #[test]
    fn test_save_and_load() {
        let manager = temp_manager("roundtrip");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut original = GameState::default();
        original.spawn_hero(&mut rng);
        original.tick = 1234;
        original.town.resources.gold = 99;

        manager.save(&original).expect("Failed to save game state");
        assert!(manager.save_exists());

        let loaded = manager.load(&mut rng).expect("Failed to load game state");
        assert_eq!(loaded.tick, 1234);
        assert_eq!(loaded.heroes, original.heroes);
        assert_eq!(loaded.town, original.town);

        manager.delete().expect("Failed to remove save file");
        assert!(!manager.save_exists());
    }

    #[test]
    fn test_load_nonexistent() {
        let manager = temp_manager("missing");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = manager.load(&mut rng);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
        assert!(manager.delete().is_ok());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let manager = temp_manager("magic");
        fs::write(manager.save_path(), [0u8; 64]).unwrap();
        let err = manager.load_data().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_oversized_length_header_rejected() {
        let manager = temp_manager("length");
        let mut bytes = SAVE_VERSION_MAGIC.to_le_bytes().to_vec();
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 40]);
        fs::write(manager.save_path(), bytes).unwrap();

        let err = manager.load_data().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("exceeds file size"));
    }
}
