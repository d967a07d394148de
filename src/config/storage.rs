//! Файлы ключей и конфигурация защиты
//!
//! Раскладка как у ssh-keygen:
//! - `<path>`      закрытый ключ (PEM, права 0600)
//! - `<path>.pub`  открытый ключ одной строкой

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, SecureKeygenError};
use crate::keygen::{AlgorithmSpec, ProtectionConfig};

const SSH_DIR: &str = ".ssh";
const PUBLIC_KEY_EXTENSION: &str = "pub";

/// Директория `~/.ssh`
pub fn get_ssh_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(SSH_DIR))
        .ok_or_else(|| SecureKeygenError::config("Не удалось определить домашнюю директорию"))
}

/// Имя файла по умолчанию для алгоритма (`id_rsa`, `id_ecdsa`, `id_ed25519`)
pub fn default_key_file_name(algorithm: &AlgorithmSpec) -> &'static str {
    match algorithm {
        AlgorithmSpec::Rsa(_) => "id_rsa",
        AlgorithmSpec::Ecdsa(_) => "id_ecdsa",
        AlgorithmSpec::Ed25519 => "id_ed25519",
    }
}

/// `~/.ssh/id_<алгоритм>`
pub fn default_key_path(algorithm: &AlgorithmSpec) -> Result<PathBuf> {
    Ok(get_ssh_dir()?.join(default_key_file_name(algorithm)))
}

/// Путь открытого ключа рядом с закрытым: `<path>.pub`
pub fn public_key_path(private_key_path: &Path) -> PathBuf {
    let mut name = private_key_path.as_os_str().to_owned();
    name.push(".");
    name.push(PUBLIC_KEY_EXTENSION);
    PathBuf::from(name)
}

/// Создать родительскую директорию (0700 на Unix, если её ещё нет)
fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() {
        return Ok(());
    }

    fs::create_dir_all(parent)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(parent, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// Сохранить пару ключей
///
/// Существующие файлы перезаписываются только при `force`.
pub fn save_key_files(
    private_key_path: &Path,
    private_pem: &str,
    public_openssh: &str,
    force: bool,
) -> Result<PathBuf> {
    let pub_path = public_key_path(private_key_path);

    if !force {
        for path in [private_key_path, pub_path.as_path()] {
            if path.exists() {
                return Err(SecureKeygenError::KeyFileExists(path.display().to_string()));
            }
        }
    }

    ensure_parent_dir(private_key_path)?;

    // Закрытый ключ: права выставляются при создании, а не после записи
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(private_key_path)?;
    file.write_all(private_pem.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;

    // При перезаписи open() не меняет права существующего файла
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(private_key_path, fs::Permissions::from_mode(0o600))?;
    }

    let mut pub_file = File::create(&pub_path)?;
    pub_file.write_all(public_openssh.as_bytes())?;
    pub_file.write_all(b"\n")?;

    Ok(pub_path)
}

/// Прочитать конфигурацию защиты из JSON; отсутствующие поля берутся по умолчанию
pub fn load_protection_config(path: &Path) -> Result<ProtectionConfig> {
    let content = fs::read_to_string(path)?;
    let config: ProtectionConfig = serde_json::from_str(&content)
        .map_err(|e| SecureKeygenError::config(format!("{}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Cipher, PrfHash};
    use crate::keygen::RsaSpec;

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "secure-keygen-{}-{}-{}",
            name,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn test_default_file_names() {
        assert_eq!(
            default_key_file_name(&AlgorithmSpec::Rsa(RsaSpec::default())),
            "id_rsa"
        );
        assert_eq!(default_key_file_name(&AlgorithmSpec::Ed25519), "id_ed25519");
    }

    #[test]
    fn test_public_key_path() {
        assert_eq!(
            public_key_path(Path::new("/tmp/keys/id_ed25519")),
            PathBuf::from("/tmp/keys/id_ed25519.pub")
        );
    }

    #[test]
    fn test_save_and_refuse_overwrite() {
        let dir = scratch_dir("save");
        let key_path = dir.join("id_ed25519");

        let pub_path = save_key_files(&key_path, "PEM", "ssh-ed25519 AAAA", false).unwrap();
        assert_eq!(fs::read_to_string(&key_path).unwrap(), "PEM\n");
        assert_eq!(fs::read_to_string(&pub_path).unwrap(), "ssh-ed25519 AAAA\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&key_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let err = save_key_files(&key_path, "PEM2", "ssh-ed25519 BBBB", false).unwrap_err();
        assert!(matches!(err, SecureKeygenError::KeyFileExists(_)));

        save_key_files(&key_path, "PEM2", "ssh-ed25519 BBBB", true).unwrap();
        assert_eq!(fs::read_to_string(&key_path).unwrap(), "PEM2\n");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_partial_protection_config() {
        let dir = scratch_dir("config");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("protection.json");
        fs::write(&path, r#"{"kdf":{"hash":"SHA-256","iterations":200000}}"#).unwrap();

        let config = load_protection_config(&path).unwrap();
        assert_eq!(config.cipher, Cipher::Aes256Cbc);
        assert_eq!(config.kdf.hash, PrfHash::Sha256);
        assert_eq!(config.kdf.iterations, 200_000);
        assert_eq!(config.kdf.salt_size, 16);

        fs::write(&path, r#"{"cipher":"rc4"}"#).unwrap();
        assert!(matches!(
            load_protection_config(&path),
            Err(SecureKeygenError::Configuration(_))
        ));

        fs::write(&path, r#"{"kdf":{"saltSize":0}}"#).unwrap();
        assert!(matches!(
            load_protection_config(&path),
            Err(SecureKeygenError::Configuration(_))
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
