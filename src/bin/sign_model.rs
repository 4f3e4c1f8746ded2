//! Model signing utility for DepositScope models.
//!
//! Creates a manifest (`manifest.json`) and Ed25519 signature (`model.sig`)
//! for a model directory, enabling verification at load time.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin sign_model -- <model_dir> [--bind <file>]...
//! ```
//!
//! # Security
//!
//! - Signing key sourced from an inherited FD or a file
//! - Manifest includes SHA-256 hashes of all bound files
//! - Private key material zeroized after use

use std::collections::BTreeMap;
use std::env;
use std::fs;
#[cfg(unix)]
use std::os::unix::io::FromRawFd;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use depositscope::adapters::model::{
    sha256_hex, ModelManifest, MANIFEST_FILE, MANIFEST_VERSION, MODEL_FILE, SIGNATURE_FILE,
};

const KEY_FD_ENV: &str = "DEPOSITSCOPE_MODEL_SIGNING_KEY_B64_FD";
const KEY_FILE_ENV: &str = "DEPOSITSCOPE_MODEL_SIGNING_KEY_B64_FILE";

#[derive(Zeroize, ZeroizeOnDrop)]
struct Seed([u8; 32]);

fn non_empty_secret(raw: String) -> Result<Zeroizing<String>, String> {
    let raw = Zeroizing::new(raw);
    let secret = raw.trim_end_matches(['\n', '\r']).to_string();
    if secret.is_empty() {
        return Err("Empty signing key".to_string());
    }
    Ok(Zeroizing::new(secret))
}

fn read_signing_seed_b64() -> Result<Zeroizing<String>, String> {
    #[cfg(unix)]
    if let Ok(fd_str) = env::var(KEY_FD_ENV) {
        let fd: i32 = fd_str
            .trim()
            .parse()
            .map_err(|_| "Invalid key FD".to_string())?;
        if fd <= 2 {
            return Err("Refusing to read signing key from stdio FD".to_string());
        }
        // SAFETY: take ownership of FD for one-time secret read.
        let mut file = unsafe { std::fs::File::from_raw_fd(fd) };
        let mut buf = String::new();
        use std::io::Read;
        file.read_to_string(&mut buf)
            .map_err(|e| format!("Failed reading signing key from FD: {e}"))?;
        return non_empty_secret(buf);
    }

    if let Ok(path) = env::var(KEY_FILE_ENV) {
        let content = fs::read_to_string(path.trim())
            .map_err(|e| format!("Failed reading signing key file: {e}"))?;
        return non_empty_secret(content);
    }

    Err(format!(
        "Missing signing key. Provide {KEY_FD_ENV} or {KEY_FILE_ENV} (see generate_keypair)."
    ))
}

fn read_signing_seed() -> Result<Seed, String> {
    let v = read_signing_seed_b64()?;

    let raw = Zeroizing::new(
        general_purpose::STANDARD
            .decode(v.trim())
            .map_err(|e| format!("Invalid base64 in signing key: {e}"))?,
    );

    let seed: [u8; 32] = raw.as_slice().try_into().map_err(|_| {
        format!(
            "Signing key seed must be 32 bytes after base64 decode (got {})",
            raw.len()
        )
    })?;
    Ok(Seed(seed))
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn usage() -> String {
    "Usage: sign_model <model_dir> [--bind <file>]...".to_string()
}

fn parse_args() -> Result<(PathBuf, Vec<String>), String> {
    let mut args = env::args().skip(1);
    let mut model_dir: Option<PathBuf> = None;
    let mut extra: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => extra.push(args.next().ok_or_else(usage)?),
            "-h" | "--help" => return Err(usage()),
            _ => {
                if model_dir.is_none() {
                    model_dir = Some(PathBuf::from(arg));
                } else {
                    return Err(usage());
                }
            }
        }
    }

    let model_dir = model_dir.ok_or_else(usage)?;
    Ok((model_dir, extra))
}

fn hash_file(dir: &Path, rel: &str) -> Result<String, String> {
    let path = dir.join(rel);
    let bytes = fs::read(&path).map_err(|e| format!("Failed to read {path:?}: {e}"))?;
    Ok(sha256_hex(&bytes))
}

fn main() -> Result<(), String> {
    let (model_dir, extra) = parse_args()?;

    let (model_dir, model_file) = if model_dir.is_file() {
        let file = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| "Model path has no file name".to_string())?;
        let dir = model_dir
            .parent()
            .ok_or_else(|| "Model path has no parent directory".to_string())?
            .to_path_buf();
        (dir, file)
    } else {
        (model_dir, MODEL_FILE.to_string())
    };

    let seed = read_signing_seed()?;
    let signing_key = SigningKey::from_bytes(&seed.0);
    drop(seed);
    let verifying_key = signing_key.verifying_key();

    let mut files: BTreeMap<String, String> = BTreeMap::new();
    for rel in std::iter::once(&model_file).chain(extra.iter()) {
        files.insert(rel.clone(), hash_file(&model_dir, rel)?);
    }

    let manifest = ModelManifest {
        version: MANIFEST_VERSION,
        created_at: Some(unix_now()),
        files,
    };
    let manifest_bytes = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize {MANIFEST_FILE}: {e}"))?;

    let manifest_path = model_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, &manifest_bytes)
        .map_err(|e| format!("Failed to write {manifest_path:?}: {e}"))?;

    let sig: Signature = signing_key.sign(&manifest_bytes);
    let sig_path = model_dir.join(SIGNATURE_FILE);
    fs::write(&sig_path, sig.to_bytes())
        .map_err(|e| format!("Failed to write {sig_path:?}: {e}"))?;

    println!("Signed manifest: {manifest_path:?}");
    println!("Wrote signature: {sig_path:?}");
    println!(
        "DEPOSITSCOPE_MODEL_PUBKEY_B64={}",
        general_purpose::STANDARD.encode(verifying_key.as_bytes())
    );

    Ok(())
}
