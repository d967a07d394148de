//! Генерация пары SSH-ключей

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use colored::Colorize;
use secrecy::SecretString;
use serde::Serialize;

use crate::config;
use crate::crypto::{Cipher, KeyPair, NamedCurve, PrfHash, RsaHash};
use crate::error::{Result, SecureKeygenError};
use crate::keygen::{
    generate_ssh_key, AlgorithmSpec, EcdsaSpec, EncryptionDescriptor, GeneratedKey, KeyMeta,
    KeySpec, RsaSpec,
};

use super::{confirm, is_interactive, prompt_new_passphrase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KeyType {
    Rsa,
    Ecdsa,
    Ed25519,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Тип ключа
    #[arg(short = 't', long = "type", value_enum, default_value = "ed25519")]
    pub key_type: KeyType,

    /// Длина модуля RSA (2048, 3072, 4096)
    #[arg(short, long)]
    pub bits: Option<usize>,

    /// Открытая экспонента RSA
    #[arg(long)]
    pub exponent: Option<u64>,

    /// Хеш подписи RSA (SHA-256, SHA-384, SHA-512)
    #[arg(long)]
    pub hash: Option<RsaHash>,

    /// Кривая ECDSA (P-256, P-384, P-521)
    #[arg(long)]
    pub curve: Option<NamedCurve>,

    /// Комментарий открытого ключа
    #[arg(short = 'C', long)]
    pub comment: Option<String>,

    /// Файл закрытого ключа (по умолчанию ~/.ssh/id_<тип>)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Парольная фраза (без флага будет запрошена интерактивно)
    #[arg(short = 'N', long, conflicts_with = "no_passphrase")]
    pub passphrase: Option<String>,

    /// Не шифровать закрытый ключ и не спрашивать фразу
    #[arg(long)]
    pub no_passphrase: bool,

    /// JSON с параметрами запроса в формате интерфейса
    #[arg(long, conflicts_with_all = ["bits", "exponent", "hash", "curve"])]
    pub options: Option<PathBuf>,

    /// JSON с настройками шифрования закрытого ключа
    #[arg(long)]
    pub protection_config: Option<PathBuf>,

    /// Шифр (aes-128-cbc, aes-192-cbc, aes-256-cbc)
    #[arg(long)]
    pub cipher: Option<Cipher>,

    /// Число итераций PBKDF2
    #[arg(long)]
    pub kdf_iterations: Option<u32>,

    /// Длина соли PBKDF2 в байтах
    #[arg(long)]
    pub kdf_salt_size: Option<usize>,

    /// PRF для PBKDF2 (SHA-1, SHA-256, SHA-384, SHA-512)
    #[arg(long)]
    pub kdf_hash: Option<PrfHash>,

    /// Перезаписать существующие файлы
    #[arg(long)]
    pub force: bool,

    /// Вывести ключи в stdout вместо записи в файлы
    #[arg(long)]
    pub stdout: bool,

    /// Вывести сводку в JSON
    #[arg(long)]
    pub json: bool,
}

/// Сводка для `--json`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary<'a> {
    public_key: &'a str,
    fingerprint: &'a str,
    meta: &'a KeyMeta,
    encryption: Option<&'a EncryptionDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key_path: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_key_path: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<&'a str>,
}

impl GenerateArgs {
    fn algorithm(&self) -> AlgorithmSpec {
        match self.key_type {
            KeyType::Rsa => {
                let defaults = RsaSpec::default();
                AlgorithmSpec::Rsa(RsaSpec {
                    modulus_length: self.bits.unwrap_or(defaults.modulus_length),
                    public_exponent: self.exponent.unwrap_or(defaults.public_exponent),
                    hash: self.hash.unwrap_or(defaults.hash),
                })
            }
            KeyType::Ecdsa => AlgorithmSpec::Ecdsa(EcdsaSpec {
                named_curve: self.curve.unwrap_or_default(),
            }),
            KeyType::Ed25519 => AlgorithmSpec::Ed25519,
        }
    }

    /// Собрать запрос из флагов; парольная фраза здесь не запрашивается
    pub fn key_spec(&self) -> Result<KeySpec> {
        let mut spec = match &self.options {
            Some(path) => KeySpec::from_json(&fs::read_to_string(path)?)?,
            None => KeySpec::new(self.algorithm()),
        };

        if let Some(comment) = &self.comment {
            spec.comment = Some(comment.clone());
        }

        if let Some(path) = &self.protection_config {
            spec.protection = config::load_protection_config(path)?;
        }
        if let Some(cipher) = self.cipher {
            spec.protection.cipher = cipher;
        }
        if let Some(iterations) = self.kdf_iterations {
            spec.protection.kdf.iterations = iterations;
        }
        if let Some(salt_size) = self.kdf_salt_size {
            spec.protection.kdf.salt_size = salt_size;
        }
        if let Some(hash) = self.kdf_hash {
            spec.protection.kdf.hash = hash;
        }

        if self.no_passphrase {
            spec.passphrase = None;
        } else if let Some(passphrase) = &self.passphrase {
            spec.passphrase = Some(SecretString::new(passphrase.clone()));
        }

        Ok(spec)
    }

    fn should_prompt_passphrase(&self, spec: &KeySpec) -> bool {
        !self.no_passphrase && spec.passphrase.is_none() && is_interactive()
    }
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let quiet = args.json || args.stdout;
    let mut spec = args.key_spec()?;

    // Параметры проверяются до вопросов и до генерации
    spec.validate()?;

    let key_path = if args.stdout {
        None
    } else {
        Some(match &args.file {
            Some(path) => path.clone(),
            None => config::default_key_path(&spec.algorithm)?,
        })
    };

    let mut force = args.force;
    if let Some(path) = &key_path {
        let pub_path = config::public_key_path(path);
        if !force && (path.exists() || pub_path.exists()) {
            if !is_interactive() {
                return Err(SecureKeygenError::KeyFileExists(path.display().to_string()));
            }
            eprintln!(
                "{} {} уже существует.",
                "Внимание:".yellow().bold(),
                path.display()
            );
            if !confirm("Перезаписать?") {
                return Err(SecureKeygenError::Cancelled);
            }
            force = true;
        }
    }

    if args.should_prompt_passphrase(&spec) {
        spec.passphrase = prompt_new_passphrase()?;
        eprintln!();
    }

    if !quiet {
        print!("{}", format!("Генерация ключа {}... ", args_label(&spec)).cyan());
        std::io::stdout().flush()?;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let key = runtime.block_on(generate_ssh_key(&spec))?;

    if !quiet {
        println!("{}", "готово".green());
    }

    let pub_path = match &key_path {
        Some(path) => Some(config::save_key_files(
            path,
            &key.private_pem,
            &key.public_openssh,
            force,
        )?),
        None => None,
    };

    if args.json {
        print_json(&key, key_path.as_deref(), pub_path.as_deref())
    } else if args.stdout {
        println!("{}", key.private_pem.as_str());
        println!("{}", key.public_openssh);
        Ok(())
    } else {
        print_report(&key, key_path.as_deref(), pub_path.as_deref());
        Ok(())
    }
}

fn args_label(spec: &KeySpec) -> String {
    match &spec.algorithm {
        AlgorithmSpec::Rsa(rsa) => format!("RSA-{}", rsa.modulus_length),
        AlgorithmSpec::Ecdsa(ecdsa) => format!("ECDSA {}", ecdsa.named_curve),
        AlgorithmSpec::Ed25519 => "Ed25519".to_string(),
    }
}

fn print_json(
    key: &GeneratedKey<KeyPair>,
    private_key_path: Option<&Path>,
    public_key_path: Option<&Path>,
) -> Result<()> {
    // Без файлов закрытый ключ попадает в сводку, иначе его некуда деть
    let private_key = private_key_path
        .is_none()
        .then(|| key.private_pem.as_str());

    let summary = Summary {
        public_key: &key.public_openssh,
        fingerprint: &key.fingerprint,
        meta: &key.meta,
        encryption: key.encryption.as_ref(),
        private_key_path,
        public_key_path,
        private_key,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn print_report(
    key: &GeneratedKey<KeyPair>,
    private_key_path: Option<&Path>,
    public_key_path: Option<&Path>,
) {
    println!();
    if let Some(path) = private_key_path {
        println!("Закрытый ключ:  {}", path.display().to_string().cyan());
    }
    if let Some(path) = public_key_path {
        println!("Открытый ключ:  {}", path.display().to_string().cyan());
    }
    println!("Отпечаток:      {}", key.fingerprint.bold());

    match &key.encryption {
        Some(enc) => println!(
            "Шифрование:     {} / {}-{} ({} итераций) / {}",
            enc.scheme.green(),
            enc.kdf.algo,
            enc.kdf.prf,
            enc.kdf.iterations,
            enc.cipher
        ),
        None => println!(
            "Шифрование:     {}",
            "нет (ключ сохранён без парольной фразы)".yellow()
        ),
    }

    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", key.public_openssh);
    println!("{}", "─".repeat(60).dimmed());
    println!();
    println!(
        "Добавьте этот ключ в {} на ваших серверах.",
        "~/.ssh/authorized_keys".cyan()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: GenerateArgs,
    }

    fn parse(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["secure-keygen"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_rsa_flags() {
        let args = parse(&["-t", "rsa", "-b", "4096", "--hash", "SHA-512"]);
        let spec = args.key_spec().unwrap();
        assert_eq!(
            spec.algorithm,
            AlgorithmSpec::Rsa(RsaSpec {
                modulus_length: 4096,
                public_exponent: 65537,
                hash: RsaHash::Sha512,
            })
        );
    }

    #[test]
    fn test_defaults_to_ed25519_without_passphrase() {
        let args = parse(&["--no-passphrase"]);
        let spec = args.key_spec().unwrap();
        assert_eq!(spec.algorithm, AlgorithmSpec::Ed25519);
        assert!(spec.passphrase_bytes().is_none());
        assert!(!args.should_prompt_passphrase(&spec));
    }

    #[test]
    fn test_protection_overrides() {
        let args = parse(&[
            "-t",
            "ecdsa",
            "--curve",
            "P-384",
            "-N",
            "secret",
            "--cipher",
            "aes-128-cbc",
            "--kdf-hash",
            "SHA-256",
            "--kdf-iterations",
            "5000",
        ]);
        let spec = args.key_spec().unwrap();
        assert_eq!(
            spec.algorithm,
            AlgorithmSpec::Ecdsa(EcdsaSpec {
                named_curve: NamedCurve::P384
            })
        );
        assert_eq!(spec.passphrase_bytes(), Some(&b"secret"[..]));
        assert_eq!(spec.protection.cipher, Cipher::Aes128Cbc);
        assert_eq!(spec.protection.kdf.hash, PrfHash::Sha256);
        assert_eq!(spec.protection.kdf.iterations, 5000);
        assert_eq!(spec.protection.kdf.salt_size, 16);
    }

    #[test]
    fn test_unknown_curve_is_rejected_by_parser() {
        let result = TestCli::try_parse_from(["secure-keygen", "-t", "ecdsa", "--curve", "P-999"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(args_label(&KeySpec::rsa(2048)), "RSA-2048");
        assert_eq!(args_label(&KeySpec::ecdsa(NamedCurve::P521)), "ECDSA P-521");
    }
}
