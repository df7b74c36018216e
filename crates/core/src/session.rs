use sha2::{Digest, Sha256};

use crate::types::RemoteFile;

/// Identity of a locally selected video.
///
/// Two selections are the same video only if name, length and content hash
/// all agree. A matching name alone is not enough.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFingerprint {
    pub file_name: String,
    pub len: u64,
    pub sha256: String,
}

impl VideoFingerprint {
    pub fn of(file_name: &str, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.to_string(),
            len: bytes.len() as u64,
            sha256: format!("{:x}", Sha256::digest(bytes)),
        }
    }
}

/// The remote video this session last uploaded.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedVideo {
    pub fingerprint: VideoFingerprint,
    pub remote: RemoteFile,
}

impl CachedVideo {
    pub fn name(&self) -> &str {
        &self.remote.name
    }

    pub fn display_name(&self) -> &str {
        &self.fingerprint.file_name
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Populated,
    Replaced,
}

/// Per-session state threaded through every interaction.
#[derive(Debug, Default)]
pub struct Session {
    cached: Option<CachedVideo>,
    replacements: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self) -> Option<&CachedVideo> {
        self.cached.as_ref()
    }

    pub fn state(&self) -> SessionState {
        match (&self.cached, self.replacements) {
            (None, _) => SessionState::Empty,
            (Some(_), 0) => SessionState::Populated,
            (Some(_), _) => SessionState::Replaced,
        }
    }

    /// Cached video matching `fingerprint`, if any.
    pub fn lookup(&self, fingerprint: &VideoFingerprint) -> Option<&CachedVideo> {
        self.cached.as_ref().filter(|c| &c.fingerprint == fingerprint)
    }

    /// True when a cached video shares the name but not the content.
    pub fn is_name_collision(&self, fingerprint: &VideoFingerprint) -> bool {
        self.cached.as_ref().is_some_and(|c| {
            c.fingerprint.file_name == fingerprint.file_name && c.fingerprint != *fingerprint
        })
    }

    /// Store a freshly uploaded video, replacing whatever was cached.
    pub fn store(&mut self, fingerprint: VideoFingerprint, remote: RemoteFile) -> &CachedVideo {
        if self.cached.is_some() {
            self.replacements += 1;
        }
        self.cached.insert(CachedVideo {
            fingerprint,
            remote,
        })
    }

    /// Refresh the remote record of the cached video after polling. The MIME
    /// type recorded at upload survives a refresh that omits it.
    pub fn update_remote(&mut self, mut remote: RemoteFile) {
        if let Some(cached) = self.cached.as_mut().filter(|c| c.remote.name == remote.name) {
            if remote.mime_type.is_none() {
                remote.mime_type = cached.remote.mime_type.take();
            }
            cached.remote = remote;
        }
    }

    /// Drop the cached reference if it points at `remote_name`.
    pub fn forget_remote(&mut self, remote_name: &str) -> bool {
        if self.cached.as_ref().is_some_and(|c| c.remote.name == remote_name) {
            self.cached = None;
            self.replacements = 0;
            return true;
        }
        false
    }
}
