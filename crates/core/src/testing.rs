//! In-memory stand-ins for the remote service.

use std::{
    collections::{HashMap, VecDeque},
    path::Path,
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    error::{AnalyzerError, Result},
    progress::{ProgressEvent, ProgressReporter},
    remote::{FileService, GenerativeModel},
    types::{FileState, Part, RemoteFile},
};

#[derive(Default)]
struct Inner {
    listed: Vec<RemoteFile>,
    scripts: HashMap<String, VecDeque<FileState>>,
    last_state: HashMap<String, FileState>,
    get_calls: usize,
    uploads: Vec<(String, String, Vec<u8>)>,
    upload_state: Option<FileState>,
    fail_upload: bool,
    stall_upload: bool,
    stall_generate: bool,
    deleted: Vec<String>,
    generate_calls: Vec<Vec<Part>>,
    reply: Option<String>,
}

#[derive(Default)]
pub(crate) struct FakeService {
    inner: Mutex<Inner>,
}

impl FakeService {
    pub fn file(name: &str, state: FileState) -> RemoteFile {
        RemoteFile {
            name: name.to_string(),
            uri: Some(format!("https://files.test/{name}")),
            state,
            ..Default::default()
        }
    }

    pub fn script_states(&self, name: &str, states: &[FileState]) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .scripts
            .entry(name.to_string())
            .or_default()
            .extend(states.iter().copied());
    }

    pub fn set_listed(&self, files: Vec<RemoteFile>) {
        self.inner.lock().unwrap().listed = files;
    }

    /// State reported by freshly uploaded files. Defaults to processing.
    pub fn set_upload_state(&self, state: FileState) {
        self.inner.lock().unwrap().upload_state = Some(state);
    }

    pub fn fail_uploads(&self) {
        self.inner.lock().unwrap().fail_upload = true;
    }

    /// Uploads never complete.
    pub fn stall_uploads(&self) {
        self.inner.lock().unwrap().stall_upload = true;
    }

    /// Generation calls never complete, but are still recorded.
    pub fn stall_generation(&self) {
        self.inner.lock().unwrap().stall_generate = true;
    }

    pub fn set_reply(&self, text: &str) {
        self.inner.lock().unwrap().reply = Some(text.to_string());
    }

    pub fn get_calls(&self) -> usize {
        self.inner.lock().unwrap().get_calls
    }

    /// (display name, mime type, bytes) for each upload, in order.
    pub fn uploads(&self) -> Vec<(String, String, Vec<u8>)> {
        self.inner.lock().unwrap().uploads.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.inner.lock().unwrap().deleted.clone()
    }

    pub fn generate_calls(&self) -> Vec<Vec<Part>> {
        self.inner.lock().unwrap().generate_calls.clone()
    }
}

#[async_trait]
impl FileService for FakeService {
    async fn list_files(&self) -> Result<Vec<RemoteFile>> {
        Ok(self.inner.lock().unwrap().listed.clone())
    }

    async fn get_file(&self, name: &str) -> Result<RemoteFile> {
        let mut inner = self.inner.lock().unwrap();
        inner.get_calls += 1;

        if let Some(listed) = inner.listed.iter().find(|f| f.name == name) {
            return Ok(listed.clone());
        }

        let next = inner.scripts.get_mut(name).and_then(|q| q.pop_front());
        let state = match next {
            Some(state) => state,
            None => match inner.last_state.get(name) {
                Some(state) => *state,
                None => {
                    return Err(AnalyzerError::Api {
                        status: 404,
                        message: format!("{name} not found"),
                    });
                }
            },
        };
        inner.last_state.insert(name.to_string(), state);
        Ok(Self::file(name, state))
    }

    async fn upload_file(&self, path: &Path, display_name: &str, mime_type: &str) -> Result<RemoteFile> {
        let bytes = std::fs::read(path)?;
        let stall = self.inner.lock().unwrap().stall_upload;
        if stall {
            std::future::pending::<()>().await;
        }
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_upload {
            return Err(AnalyzerError::Api {
                status: 500,
                message: "upload rejected".to_string(),
            });
        }

        inner
            .uploads
            .push((display_name.to_string(), mime_type.to_string(), bytes));
        let name = format!("files/upload-{}", inner.uploads.len());
        let state = inner.upload_state.unwrap_or(FileState::Processing);
        inner.last_state.insert(name.clone(), state);

        let mut file = Self::file(&name, state);
        file.display_name = Some(display_name.to_string());
        Ok(file)
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.listed.retain(|f| f.name != name);
        inner.deleted.push(name.to_string());
        Ok(())
    }
}

#[async_trait]
impl GenerativeModel for FakeService {
    async fn generate_content(&self, parts: &[Part], _timeout: Duration) -> Result<String> {
        let stall = {
            let mut inner = self.inner.lock().unwrap();
            inner.generate_calls.push(parts.to_vec());
            inner.stall_generate
        };
        if stall {
            std::future::pending::<()>().await;
        }
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .reply
            .clone()
            .unwrap_or_else(|| "generated text".to_string()))
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    pub events: Vec<ProgressEvent>,
}

impl ProgressReporter for RecordingReporter {
    fn on_event(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}
