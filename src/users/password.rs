use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

/// Memory cost for new hashes, in KiB.
pub const MEMORY_KIB: u32 = 19 * 1024;
pub const ITERATIONS: u32 = 2;
pub const LANES: u32 = 1;

/// Argon2id at the service's fixed cost. Callers never pick parameters.
fn policy() -> anyhow::Result<Argon2<'static>> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, LANES, None)
        .map_err(|e| anyhow::anyhow!("argon2 params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Produces a PHC string (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`) with a
/// fresh salt. Everything needed to verify it later is in the string itself.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = policy()?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 hash_password: {e}"))?
        .to_string();
    Ok(hash)
}

/// Verifies against the cost recorded in `hash`, so rows hashed under an
/// older cost keep working. `Ok(false)` on mismatch; `Err` when the stored
/// value is unparseable or not Argon2id.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("argon2 parse hash: {e}"))?;
    if parsed.algorithm != Algorithm::Argon2id.ident() {
        anyhow::bail!("argon2 unsupported hash algorithm {}", parsed.algorithm);
    }
    match policy()?.verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("argon2 verify_password: {e}")),
    }
}
