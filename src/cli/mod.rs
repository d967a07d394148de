//! Реализация CLI команд

pub mod defaults;
pub mod generate;

use std::io::{self, IsTerminal, Write};

use colored::Colorize;
use secrecy::SecretString;

use crate::error::{Result, SecureKeygenError};

/// Запросить парольную фразу для закрытого ключа с подтверждением
///
/// Пустая фраза означает ключ без шифрования.
pub fn prompt_new_passphrase() -> Result<Option<SecretString>> {
    eprintln!("{}", "Защита закрытого ключа".cyan().bold());
    eprintln!("Оставьте фразу пустой, чтобы сохранить ключ без шифрования.\n");

    let passphrase = rpassword::prompt_password("Введите парольную фразу: ")?;
    if passphrase.is_empty() {
        return Ok(None);
    }

    let confirm = rpassword::prompt_password("Подтвердите парольную фразу: ")?;
    if passphrase != confirm {
        return Err(SecureKeygenError::PassphraseMismatch);
    }

    Ok(Some(SecretString::new(passphrase)))
}

/// Можно ли задавать вопросы пользователю
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Запросить подтверждение да/нет
pub fn confirm(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "д" | "да")
}
