//! Параметры по умолчанию

use serde::Serialize;

use crate::crypto::NamedCurve;
use crate::error::Result;
use crate::keygen::{ProtectionConfig, RsaSpec};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Defaults {
    rsa: RsaSpec,
    ecdsa_curve: NamedCurve,
    protection: ProtectionConfig,
}

/// Вывести параметры по умолчанию в JSON
///
/// Блок `protection` подходит как файл для `--protection-config`.
pub fn run() -> Result<()> {
    let defaults = Defaults {
        rsa: RsaSpec::default(),
        ecdsa_curve: NamedCurve::default(),
        protection: ProtectionConfig::default(),
    };
    println!("{}", serde_json::to_string_pretty(&defaults)?);
    Ok(())
}
