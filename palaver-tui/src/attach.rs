use std::path::{Path, PathBuf};

use palaver_core::{Attachment, AttachmentKind};

#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a file")]
    NotAFile(PathBuf),
}

/// Reads a local file into an attachment. Image bytes are loaded for the
/// preview; other kinds only need name, size, and classification. Runs as
/// a spawned task: concurrent loads complete independently, in no
/// particular order.
pub async fn load(path: PathBuf) -> Result<Attachment, AttachError> {
    let metadata = tokio::fs::metadata(&path).await.map_err(|source| AttachError::Read {
        path: path.clone(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(AttachError::NotAFile(path));
    }
    let kind = classify(&path);
    let data = if kind == AttachmentKind::Image {
        let bytes = tokio::fs::read(&path).await.map_err(|source| AttachError::Read {
            path: path.clone(),
            source,
        })?;
        Some(bytes)
    } else {
        None
    };
    Ok(Attachment {
        file_name: file_name(&path),
        size_bytes: metadata.len(),
        kind,
        data,
    })
}

fn classify(path: &Path) -> AttachmentKind {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(AttachmentKind::from_extension)
        .unwrap_or(AttachmentKind::Other)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_the_extension() {
        assert_eq!(classify(Path::new("/tmp/shot.PNG")), AttachmentKind::Image);
        assert_eq!(classify(Path::new("notes.docx")), AttachmentKind::Word);
        assert_eq!(classify(Path::new("no_extension")), AttachmentKind::Other);
    }

    #[tokio::test]
    async fn missing_file_reports_the_path() {
        let err = load(PathBuf::from("/definitely/not/here.txt")).await.unwrap_err();
        assert!(matches!(err, AttachError::Read { .. }));
    }
}
