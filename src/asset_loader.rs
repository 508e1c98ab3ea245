use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tokio::{io::AsyncReadExt, runtime::Handle, sync::mpsc};

const READ_CHUNK_SIZE: usize = 64 * 1024;

pub struct LoadedAsset {
    pub path: PathBuf,
    pub document: gltf::Document,
    pub buffers: Vec<gltf::buffer::Data>,
}

pub enum LoadEvent {
    /// Fraction of the file read so far, in `0.0..=1.0`.
    Progress(f32),
    Loaded(LoadedAsset),
    Failed(anyhow::Error),
}

impl std::fmt::Debug for LoadEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadEvent::Progress(fraction) => write!(f, "Progress({fraction:.3})"),
            LoadEvent::Loaded(asset) => write!(f, "Loaded({})", asset.path.display()),
            LoadEvent::Failed(error) => write!(f, "Failed({error:#})"),
        }
    }
}

pub type LoadEventSender = mpsc::UnboundedSender<LoadEvent>;

/// Receiving end of an asset load running on the tokio runtime. Events are
/// drained from the UI thread once per frame.
pub struct AssetLoader {
    receiver: mpsc::UnboundedReceiver<LoadEvent>,
}

impl AssetLoader {
    pub fn channel() -> (LoadEventSender, AssetLoader) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, AssetLoader { receiver })
    }

    pub fn spawn(runtime: &Handle, path: PathBuf) -> AssetLoader {
        let (sender, loader) = Self::channel();

        runtime.spawn(async move {
            log::info!("Loading asset {}", path.display());

            let event = match load_asset(&path, &sender).await {
                Ok(asset) => LoadEvent::Loaded(asset),
                Err(error) => LoadEvent::Failed(error),
            };

            // The window may already be gone
            let _ = sender.send(event);
        });

        loader
    }

    pub fn try_next(&mut self) -> Option<LoadEvent> {
        self.receiver.try_recv().ok()
    }
}

async fn load_asset(path: &Path, progress: &LoadEventSender) -> anyhow::Result<LoadedAsset> {
    let bytes = read_with_progress(path, progress).await?;
    let base_dir = path.parent().map(Path::to_path_buf);
    let owned_path = path.to_path_buf();

    let (document, buffers) = tokio::task::spawn_blocking(move || parse_gltf(&bytes, base_dir))
        .await
        .context("glTF parser task panicked")?
        .with_context(|| format!("Failed to parse {}", owned_path.display()))?;

    Ok(LoadedAsset {
        path: owned_path,
        document,
        buffers,
    })
}

async fn read_with_progress(path: &Path, progress: &LoadEventSender) -> anyhow::Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let total = file.metadata().await?.len();

    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let read = file
            .read(&mut chunk)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if read == 0 {
            break;
        }

        bytes.extend_from_slice(&chunk[..read]);

        if total > 0 {
            let fraction = (bytes.len() as f64 / total as f64).min(1.0) as f32;
            let _ = progress.send(LoadEvent::Progress(fraction));
        }
    }

    Ok(bytes)
}

pub fn parse_gltf(
    bytes: &[u8],
    base_dir: Option<PathBuf>,
) -> anyhow::Result<(gltf::Document, Vec<gltf::buffer::Data>)> {
    let gltf = gltf::Gltf::from_slice(bytes)?;
    let document = gltf.document;

    if document.meshes().next().is_none() {
        bail!("Asset contains no meshes");
    }

    let buffers = gltf::import_buffers(&document, base_dir.as_deref(), gltf.blob)?;

    Ok((document, buffers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_parse() {
        assert!(parse_gltf(b"definitely not gltf", None).is_err());
    }

    #[test]
    fn document_without_meshes_is_rejected() {
        let json = br#"{"asset":{"version":"2.0"},"scenes":[{"nodes":[]}],"scene":0}"#;
        let error = parse_gltf(json, None).unwrap_err();
        assert!(error.to_string().contains("no meshes"));
    }

    #[test]
    fn missing_file_reports_failure() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut loader = AssetLoader::spawn(runtime.handle(), PathBuf::from("does/not/exist.glb"));

        let event = runtime.block_on(async { loader.receiver.recv().await });

        assert!(matches!(event, Some(LoadEvent::Failed(_))));
    }
}
