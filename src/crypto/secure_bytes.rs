//! Byte container for key material that zeroes itself on drop
//!
//! Used for derived symmetric keys and unencrypted PKCS#8 documents:
//! 1. Zeroed when dropped
//! 2. Never printed by `Debug`
//! 3. Locked in memory where the platform allows it

use std::ops::Deref;
use zeroize::Zeroize;

pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Take ownership of `data`; the buffer is locked and later wiped from here
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    /// Zeroed buffer of `len` bytes, to be filled in place
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0u8; len])
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        // Best effort: mlock fails without CAP_IPC_LOCK or over RLIMIT_MEMLOCK
        unsafe {
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    #[cfg(unix)]
    fn unlock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        unsafe {
            libc::munlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn unlock_memory(&self) {}
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.0.zeroize();
        self.unlock_memory();
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl Clone for SecureBytes {
    fn clone(&self) -> Self {
        Self::new(self.0.clone())
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
