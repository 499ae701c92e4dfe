//! 設定ファイル管理モジュール
//!
//! エミュレータの設定をJSON形式で永続化

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 設定ファイルのデフォルトパス
const CONFIG_FILE: &str = "a2plus_config.json";

fn default_rom() -> String {
    "assets/appleII+.rom".to_string()
}

fn default_disk_rom() -> String {
    "assets/diskII.rom".to_string()
}

fn default_fps() -> u64 {
    60
}

/// エミュレータ設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// APPLESOFT ROMのパス
    #[serde(default = "default_rom")]
    pub rom_path: String,
    /// Disk ][ PROMのパス
    #[serde(default = "default_disk_rom")]
    pub disk_rom_path: String,
    /// 最後に使用したフロッピーのパス
    pub last_disk: Option<String>,
    /// 目標フレームレート
    #[serde(default = "default_fps")]
    pub fps: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rom_path: default_rom(),
            disk_rom_path: default_disk_rom(),
            last_disk: None,
            fps: default_fps(),
        }
    }
}

impl Config {
    /// 設定ファイルを読み込む
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// 指定したパスから設定を読み込む
    /// ファイルがない、または壊れている場合はデフォルトに戻る
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to parse config: {}, using defaults", e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    /// 設定ファイルを保存する
    pub fn save(&self) -> Result<(), String> {
        self.save_to(CONFIG_FILE)
    }

    /// 指定したパスに設定を保存する
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_from("/nonexistent/a2plus_config.json");
        assert_eq!(config.fps, 60);
        assert!(config.last_disk.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join("a2plus_test_config.json");
        let mut config = Config::default();
        config.last_disk = Some("games/karateka.nib".to_string());
        config.fps = 50;
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path);
        assert_eq!(loaded.last_disk.as_deref(), Some("games/karateka.nib"));
        assert_eq!(loaded.fps, 50);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("a2plus_test_bad_config.json");
        fs::write(&path, "{ not json").unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.fps, 60);
        fs::remove_file(&path).ok();
    }
}
