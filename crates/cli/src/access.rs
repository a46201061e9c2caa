//! Where `serve-http` may listen and who may hot-swap the index.

use crate::config::ServerConfig;
use anyhow::{Context as AnyhowContext, Result};
use sha2::{Digest, Sha256};
use std::net::SocketAddr;

pub(crate) const ADMIN_TOKEN_ENV: &str = "PANTRY_ADMIN_TOKEN";

/// Operator credential for `POST /reload`.
///
/// Only the SHA-256 of the token is held, and requests are checked by
/// comparing digests over their full width.
#[derive(Clone)]
pub(crate) struct ReloadKey {
    digest: [u8; 32],
}

impl ReloadKey {
    pub(crate) fn from_secret(secret: &str) -> Result<Self> {
        let secret = secret.trim();
        if secret.is_empty() {
            anyhow::bail!("admin token is blank (check --admin-token / {ADMIN_TOKEN_ENV})");
        }
        Ok(Self {
            digest: Sha256::digest(secret.as_bytes()).into(),
        })
    }

    /// `Authorization: Bearer <token>`; the scheme is case-insensitive.
    pub(crate) fn admits(&self, authorization: &str) -> bool {
        let mut parts = authorization.split_whitespace();
        let (Some(scheme), Some(credential), None) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case("bearer") {
            return false;
        }

        let presented: [u8; 32] = Sha256::digest(credential.as_bytes()).into();
        presented
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for ReloadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ReloadKey(..)")
    }
}

/// `[server]` merged with `serve-http` flags.
#[derive(Debug)]
pub(crate) struct ServePlan {
    pub bind: String,
    pub addrs: Vec<SocketAddr>,
    pub reload_key: Option<ReloadKey>,
}

impl ServePlan {
    /// Flags override `[server]`; `public` is granted by either.
    ///
    /// Fails when the address reaches beyond loopback without `public`, or
    /// when `public` is set with no admin token to guard `/reload`.
    pub(crate) async fn resolve(
        server: &ServerConfig,
        bind: Option<&str>,
        public: bool,
        admin_token: Option<&str>,
    ) -> Result<Self> {
        let bind = bind.unwrap_or(&server.bind).to_string();
        let public = public || server.public;

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(bind.as_str())
            .await
            .with_context(|| format!("Cannot resolve bind address {bind}"))?
            .collect();
        if addrs.is_empty() {
            anyhow::bail!("Bind address {bind} resolved to nothing");
        }
        if !public {
            if let Some(exposed) = addrs.iter().find(|addr| !addr.ip().is_loopback()) {
                anyhow::bail!(
                    "Refusing to bind {exposed} (from {bind}): non-loopback addresses need --public or server.public = true, plus {ADMIN_TOKEN_ENV}"
                );
            }
        }

        let reload_key = admin_token.map(ReloadKey::from_secret).transpose()?;
        if public && reload_key.is_none() {
            anyhow::bail!(
                "--public requires an admin token: set --admin-token or export {ADMIN_TOKEN_ENV}"
            );
        }

        Ok(Self {
            bind,
            addrs,
            reload_key,
        })
    }
}
