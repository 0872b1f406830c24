use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{BoxError, Error, Result};

use super::{ProcessingContext, Processor};

/// A named decryption algorithm plugged into [`DecryptProcessor`].
pub trait Decryptor: Send + Sync {
    fn name(&self) -> &str;

    fn decrypt(&self, ciphertext: &[u8]) -> std::result::Result<Vec<u8>, BoxError>;
}

/// Decrypts base64-encoded ciphertext with a registered [`Decryptor`].
///
/// `#[process(decrypt = "aes")]` selects the decryptor by name; a bare
/// `#[process(decrypt)]` works when exactly one decryptor is registered.
#[derive(Clone)]
pub struct DecryptProcessor {
    decryptors: HashMap<String, Arc<dyn Decryptor>>,
}

impl DecryptProcessor {
    pub const NAME: &'static str = "decrypt";

    pub fn new(decryptors: impl IntoIterator<Item = Arc<dyn Decryptor>>) -> Result<Self> {
        let mut by_name = HashMap::new();
        for decryptor in decryptors {
            let name = decryptor.name().to_string();
            if by_name.insert(name.clone(), decryptor).is_some() {
                return Err(Error::Configuration(format!(
                    "decryptor '{name}' is registered more than once"
                )));
            }
        }
        Ok(DecryptProcessor { decryptors: by_name })
    }

    fn select(&self, name: Option<&str>) -> Result<&Arc<dyn Decryptor>> {
        match name {
            Some(name) => self.decryptors.get(name).ok_or_else(|| {
                Error::processing(Self::NAME, format!("no decryptor named '{name}' is registered"))
            }),
            None if self.decryptors.len() == 1 => self.decryptors.values().next().ok_or_else(|| {
                Error::processing(Self::NAME, "no decryptor is registered")
            }),
            None => Err(Error::processing(
                Self::NAME,
                "several decryptors are registered, name one with #[process(decrypt = \"...\")]",
            )),
        }
    }
}

impl Processor for DecryptProcessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, ctx: &ProcessingContext<'_>, value: &str) -> Result<String> {
        let decryptor = self.select(ctx.argument())?;
        let ciphertext = STANDARD
            .decode(value)
            .map_err(|e| Error::processing(Self::NAME, e))?;
        let plaintext = decryptor
            .decrypt(&ciphertext)
            .map_err(|e| Error::processing(Self::NAME, e))?;
        String::from_utf8(plaintext).map_err(|e| Error::processing(Self::NAME, e))
    }
}
