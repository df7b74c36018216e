use tracing::info;

use crate::{error::Result, remote::FileService, session::Session, types::RemoteFile};

/// Every file currently stored remotely, in service order.
pub async fn list_uploaded(files: &dyn FileService) -> Result<Vec<RemoteFile>> {
    files.list_files().await
}

/// Look the file up, then delete it. Clears the session's cached video when
/// it pointed at the deleted file.
pub async fn delete_uploaded(
    files: &dyn FileService,
    session: &mut Session,
    name: &str,
) -> Result<RemoteFile> {
    let file = files.get_file(name).await?;
    files.delete_file(&file.name).await?;

    if session.forget_remote(&file.name) {
        info!(file = %file.name, "deleted file was the cached video; session cleared");
    }
    Ok(file)
}
